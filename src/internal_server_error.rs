//! Defines the templates and route handlers for the page to display for an internal server error.
use axum::{
    Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    html::{error_view, error_view_with_flashes},
    session::Session,
};

pub struct InternalServerError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl InternalServerError<'_> {
    pub fn into_html(self) -> Html<String> {
        Html(error_view("Internal Server Error", "500", self.description, self.fix).into_string())
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.into_html()).into_response()
    }
}

/// The page that failed requests redirect to, showing the flash that explains the failure.
pub async fn get_internal_server_error_page(Extension(session): Extension<Session>) -> Response {
    let error = InternalServerError::default();

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        error_view_with_flashes(
            "Internal Server Error",
            "500",
            error.description,
            error.fix,
            &session.flashes,
        ),
    )
        .into_response()
}
