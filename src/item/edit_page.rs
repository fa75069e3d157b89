//! The page for editing a recorded spend.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, flash_messages},
    item::{
        FETCH_ERROR_MSG, ItemId, ItemState,
        form::{ItemFormDefaults, item_form_fields},
        get_item, parse_item_id,
    },
    navigation::NavBar,
    not_found::not_found_response,
    session::{Flash, FlashRedirect, Session},
};

/// Render the edit form for the item `item_id`, or a 404 page if it does not exist.
pub async fn get_edit_item_page(
    State(state): State<ItemState>,
    Path(raw_item_id): Path<String>,
    Extension(session): Extension<Session>,
) -> Response {
    let Some(item_id) = parse_item_id(&raw_item_id) else {
        return not_found_response("Item not found");
    };

    let item = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| get_item(item_id, &connection));

    match item {
        Ok(item) => edit_item_view(item_id, &ItemFormDefaults::from(&item), &session.flashes)
            .into_response(),
        Err(Error::NotFound) => not_found_response("Item not found"),
        Err(error) => {
            tracing::error!("Could not get item {item_id}: {error}");
            FlashRedirect::to(endpoints::INTERNAL_ERROR_VIEW)
                .error(FETCH_ERROR_MSG)
                .into_response()
        }
    }
}

/// The edit form on its own, so the update endpoint can send it back with an error.
///
/// The form replaces itself when the update is rejected with a 4xx status.
pub(super) fn edit_item_form(item_id: ItemId, defaults: &ItemFormDefaults<'_>) -> Markup {
    let update_url = format_endpoint(endpoints::ITEM, item_id);

    html! {
        form
            hx-patch=(update_url)
            hx-target-4xx="this"
            hx-swap="outerHTML"
            class="w-full space-y-4 md:space-y-6"
        {
            h1 class="text-xl font-bold" { "Edit Spend" }

            (item_form_fields(defaults))

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Update Spend"
            }
        }
    }
}

fn edit_item_view(item_id: ItemId, defaults: &ItemFormDefaults<'_>, flashes: &[Flash]) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_ITEM_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            (flash_messages(flashes))

            (edit_item_form(item_id, defaults))
        }
    };

    base("Edit Spend", &content)
}
