//! The page shown when a route or record does not exist.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    not_found_response("Page not found.")
}

/// A 404 page that says what could not be found, e.g. "Item not found".
pub fn not_found_response(description: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        error_view(
            "Not Found",
            "404",
            description,
            "Check the address or go back to the home page.",
        ),
    )
        .into_response()
}
