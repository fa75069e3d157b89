//! The landing page for logged in users.

use axum::{
    Extension,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    auth::UserID,
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base, flash_messages, link},
    navigation::NavBar,
    session::{Flash, Session},
};

pub async fn get_home_page(
    Extension(user_id): Extension<UserID>,
    Extension(session): Extension<Session>,
) -> Response {
    home_view(&user_id, &session.flashes).into_response()
}

fn home_view(user_id: &UserID, flashes: &[Flash]) -> Markup {
    let nav_bar = NavBar::new(endpoints::HOME).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full max-w-md"
            {
                (flash_messages(flashes))

                h1 class="text-2xl font-bold" { "Welcome, " (user_id) "!" }

                ul class="list-disc list-inside space-y-2"
                {
                    li { (link(endpoints::ADD_SPEND, "Record a spend")) }
                    li { (link(endpoints::SHOW_ALL, "See everything you have spent")) }
                    li { (link(endpoints::CALCULATE_SPENDS, "Total up a month")) }
                }
            }
        }
    };

    base("Home", &content)
}

#[cfg(test)]
mod tests {
    use axum::{Extension, http::StatusCode};
    use scraper::Selector;

    use crate::{
        auth::UserID,
        endpoints,
        session::Flash,
        test_utils::{assert_valid_html, logged_in_session, parse_html_document},
    };

    use super::get_home_page;

    #[tokio::test]
    async fn home_page_greets_user() {
        let mut session = logged_in_session("alice");
        session.flashes = vec![Flash::success("Login successful.")];

        let response = get_home_page(Extension(UserID::new("alice")), Extension(session)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let heading = html
            .select(&Selector::parse("h1").unwrap())
            .next()
            .expect("No heading found")
            .text()
            .collect::<String>();
        assert_eq!(heading, "Welcome, alice!");

        let alert = html
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("No flash message found");
        assert_eq!(alert.text().collect::<String>(), "Login successful.");

        let links = html
            .select(&Selector::parse("main a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect::<Vec<_>>();
        assert_eq!(
            links,
            vec![
                endpoints::ADD_SPEND,
                endpoints::SHOW_ALL,
                endpoints::CALCULATE_SPENDS
            ]
        );
    }
}
