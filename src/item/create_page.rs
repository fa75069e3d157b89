//! The page for recording a new spend.

use axum::{
    Extension,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, flash_messages},
    item::form::{ItemFormDefaults, item_form_fields},
    navigation::NavBar,
    session::{Flash, Session},
};

/// Render the form for adding a spend.
pub async fn get_add_spend_page(Extension(session): Extension<Session>) -> Response {
    add_spend_view(&session.flashes).into_response()
}

fn add_spend_view(flashes: &[Flash]) -> Markup {
    let nav_bar = NavBar::new(endpoints::ADD_SPEND).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            (flash_messages(flashes))

            form
                method="post"
                action=(endpoints::ADD_SPEND)
                class="w-full space-y-4 md:space-y-6"
            {
                h1 class="text-xl font-bold" { "Add Spend" }

                (item_form_fields(&ItemFormDefaults::default()))

                button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Add Spend"
                }
            }
        }
    };

    base("Add Spend", &content)
}
