//! A redirect response that also tells the session middleware what to change.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    auth::UserID,
    session::{Flash, SessionUpdate},
};

/// Redirect the client and queue flash messages for the page it lands on.
///
/// Use [FlashRedirect::to] for plain HTML forms and [FlashRedirect::hx] for
/// requests sent by HTMX.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashRedirect {
    location: String,
    hx: bool,
    update: SessionUpdate,
}

impl FlashRedirect {
    /// Redirect with `303 See Other`.
    pub fn to(location: &str) -> Self {
        Self {
            location: location.to_owned(),
            hx: false,
            update: SessionUpdate::default(),
        }
    }

    /// Redirect with the `HX-Redirect` header.
    pub fn hx(location: &str) -> Self {
        Self {
            hx: true,
            ..Self::to(location)
        }
    }

    /// Show a success message on the next page.
    pub fn success(mut self, message: &str) -> Self {
        self.update.flashes.push(Flash::success(message));
        self
    }

    /// Show an error message on the next page.
    pub fn error(mut self, message: &str) -> Self {
        self.update.flashes.push(Flash::error(message));
        self
    }

    /// Log `user_id` in on the current session.
    pub fn log_in(mut self, user_id: UserID) -> Self {
        self.update.log_in = Some(user_id);
        self
    }

    /// Delete the current session.
    pub fn destroy_session(mut self) -> Self {
        self.update.destroy = true;
        self
    }
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        let mut response = if self.hx {
            (HxRedirect(self.location), StatusCode::SEE_OTHER).into_response()
        } else {
            Redirect::to(&self.location).into_response()
        };

        if !self.update.is_empty() {
            response.extensions_mut().insert(self.update);
        }

        response
    }
}
