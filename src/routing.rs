//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, patch},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, get_log_in_page, get_log_out, get_root_page, get_sign_up_page, post_log_in,
        post_sign_up,
    },
    endpoints,
    home::get_home_page,
    internal_server_error::get_internal_server_error_page,
    item::{
        delete_item_endpoint, get_add_spend_page, get_calculate_spends_page, get_edit_item_page,
        get_show_all_page, patch_item_endpoint, post_add_spend, post_calculate_spends,
    },
    not_found::get_404_not_found,
    session::session_layer,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_root_page))
        .route(endpoints::SIGN_UP, get(get_sign_up_page).post(post_sign_up))
        .route(endpoints::LOG_IN, get(get_log_in_page).post(post_log_in))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        // TODO: Require a log in and check the item belongs to the user before
        // updating or deleting it.
        .route(
            endpoints::ITEM,
            patch(patch_item_endpoint).delete(delete_item_endpoint),
        );

    let protected_routes = Router::new()
        .route(endpoints::HOME, get(get_home_page))
        .route(endpoints::SHOW_ALL, get(get_show_all_page))
        .route(endpoints::DASHBOARD, get(get_show_all_page))
        .route(
            endpoints::CALCULATE_SPENDS,
            get(get_calculate_spends_page).post(post_calculate_spends),
        )
        .route(
            endpoints::ADD_SPEND,
            get(get_add_spend_page).post(post_add_spend),
        )
        .route(endpoints::EDIT_ITEM_VIEW, get(get_edit_item_page))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route_layer(middleware::from_fn(auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), session_layer))
        .with_state(state)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::{TestResponse, TestServer};
    use scraper::{Html, Selector};

    use crate::{
        AppState, UserID, build_router,
        endpoints::{self, format_endpoint},
        item::list_items_by_user,
        test_utils::get_test_app_state,
    };

    fn get_test_server() -> (TestServer, AppState) {
        let state = get_test_app_state();
        let app = build_router(state.clone());
        let server = TestServer::builder()
            .save_cookies()
            .build(app);

        (server, state)
    }

    fn flash_texts(response: &TestResponse) -> Vec<String> {
        Html::parse_document(&response.text())
            .select(&Selector::parse("[role=alert]").unwrap())
            .map(|alert| alert.text().collect::<String>())
            .collect()
    }

    #[track_caller]
    fn assert_see_other(response: &TestResponse, location: &str) {
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), location);
    }

    /// htmx requests are redirected with `HX-Redirect` rather than `Location`.
    #[track_caller]
    fn assert_hx_see_other(response: &TestResponse, location: &str) {
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("hx-redirect"), location);
    }

    async fn sign_up_and_log_in(server: &TestServer) {
        let response = server
            .post(endpoints::SIGN_UP)
            .form(&[
                ("userId", "alice"),
                ("username", "Alice"),
                ("password", "hunter2"),
            ])
            .await;
        assert_see_other(&response, endpoints::LOG_IN);

        let response = server
            .post(endpoints::LOG_IN)
            .form(&[("userId", "alice"), ("password", "hunter2")])
            .await;
        assert_see_other(&response, endpoints::HOME);
    }

    #[tokio::test]
    async fn protected_page_redirects_anonymous_user_to_log_in() {
        let (server, _) = get_test_server();

        for endpoint in [
            endpoints::HOME,
            endpoints::SHOW_ALL,
            endpoints::DASHBOARD,
            endpoints::ADD_SPEND,
            endpoints::CALCULATE_SPENDS,
            endpoints::LOG_OUT,
        ] {
            let response = server.get(endpoint).await;
            assert_see_other(&response, endpoints::LOG_IN);
        }
    }

    #[tokio::test]
    async fn log_in_first_message_is_shown_once() {
        let (server, _) = get_test_server();

        server.get(endpoints::HOME).await;

        let response = server.get(endpoints::LOG_IN).await;
        response.assert_status_ok();
        assert_eq!(flash_texts(&response), vec!["Please log in first."]);

        let response = server.get(endpoints::LOG_IN).await;
        assert!(flash_texts(&response).is_empty());
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (server, _) = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn spend_lifecycle() {
        let (server, state) = get_test_server();
        sign_up_and_log_in(&server).await;

        let response = server.get(endpoints::HOME).await;
        response.assert_status_ok();
        assert_eq!(flash_texts(&response), vec!["Login successful."]);

        let response = server
            .post(endpoints::ADD_SPEND)
            .form(&[
                ("nameOfItem", "Coffee"),
                ("price", "4.50"),
                ("paymentMode", "Cash"),
                ("date", "2024-05-02"),
            ])
            .await;
        assert_see_other(&response, endpoints::SHOW_ALL);

        let items = list_items_by_user(
            &UserID::new("alice"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert_eq!(items.len(), 1);
        let item_url = format_endpoint(endpoints::ITEM, items[0].id);

        let response = server.get(endpoints::SHOW_ALL).await;
        response.assert_status_ok();
        assert!(response.text().contains("Coffee"));

        let response = server
            .get(&format_endpoint(endpoints::EDIT_ITEM_VIEW, items[0].id))
            .await;
        response.assert_status_ok();

        let response = server
            .patch(&item_url)
            .form(&[
                ("nameOfItem", "Tea"),
                ("price", "3.25"),
                ("paymentMode", "Card"),
                ("date", "2024-05-03"),
            ])
            .await;
        assert_hx_see_other(&response, endpoints::SHOW_ALL);

        let response = server.get(endpoints::SHOW_ALL).await;
        assert_eq!(flash_texts(&response), vec!["Item updated successfully."]);
        assert!(response.text().contains("Tea"));

        let response = server
            .post(endpoints::CALCULATE_SPENDS)
            .form(&[("year", "2024"), ("month", "5")])
            .await;
        response.assert_status_ok();
        assert!(response.text().contains("$3.25"));

        let response = server.delete(&item_url).await;
        assert_hx_see_other(&response, endpoints::SHOW_ALL);

        let response = server.get(endpoints::SHOW_ALL).await;
        assert_eq!(flash_texts(&response), vec!["Item deleted successfully."]);
        assert!(response.text().contains("No spends recorded yet."));
    }

    #[tokio::test]
    async fn non_numeric_item_id_is_not_a_bad_request() {
        let (server, _) = get_test_server();
        sign_up_and_log_in(&server).await;
        server.get(endpoints::HOME).await;

        let response = server.get("/item/abc/edit").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("Item not found"));

        let response = server
            .patch("/item/abc")
            .form(&[
                ("nameOfItem", "Tea"),
                ("price", "3.25"),
                ("paymentMode", "Card"),
                ("date", "2024-05-03"),
            ])
            .await;
        assert_hx_see_other(&response, endpoints::SHOW_ALL);

        let response = server.delete("/item/abc").await;
        assert_hx_see_other(&response, endpoints::SHOW_ALL);
    }

    #[tokio::test]
    async fn log_out_ends_session() {
        let (server, _) = get_test_server();
        sign_up_and_log_in(&server).await;

        let response = server.get(endpoints::LOG_OUT).await;
        assert_see_other(&response, endpoints::LOG_IN);

        let response = server.get(endpoints::HOME).await;
        assert_see_other(&response, endpoints::LOG_IN);
    }

    #[tokio::test]
    async fn root_redirects_logged_in_user_home() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::ROOT).await;
        response.assert_status_ok();

        sign_up_and_log_in(&server).await;

        let response = server.get(endpoints::ROOT).await;
        assert_see_other(&response, endpoints::HOME);
    }
}
