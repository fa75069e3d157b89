//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The session module handles the lower level session and cookie logic.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{UserID, get_password_hash},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base, link, log_in_register, password_input, required_input},
    session::{Flash, FlashRedirect, Session},
};

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid User ID or Password.";
pub const DATABASE_ERROR_MSG: &str = "Database error.";
pub const LOG_IN_SUCCESS_MSG: &str = "Login successful.";

fn log_in_form() -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::LOG_IN)
            class="space-y-4 md:space-y-6"
        {
            (required_input("userId", "User ID", "text", ""))

            (password_input())

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Don't have an account? "
                (link(endpoints::SIGN_UP, "Sign up here"))
            }
        }
    }
}

fn log_in_view(flashes: &[Flash]) -> Markup {
    let content = log_in_register("Log in to your account", flashes, &log_in_form());
    base("Log In", &content)
}

/// Display the log-in page, or send logged in users to the home page.
pub async fn get_log_in_page(Extension(session): Extension<Session>) -> Response {
    if session.is_authenticated() {
        return Redirect::to(endpoints::HOME).into_response();
    }

    log_in_view(&session.flashes).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user in the log-in form.
///
/// The password is stored as a plain string. There is no need for validation here since
/// it will be compared against the password hash in the database.
#[derive(Deserialize)]
pub struct LogInForm {
    /// The user ID chosen at sign-up.
    #[serde(rename = "userId")]
    pub user_id: String,

    /// Password entered during log-in.
    pub password: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the session is marked as logged in and the client is
/// redirected to the home page. Otherwise, the client is sent back to the log-in page with a
/// flash message explaining the problem.
///
/// The database lock is released before the password is checked against its hash.
pub async fn post_log_in(
    State(state): State<LogInState>,
    Form(form): Form<LogInForm>,
) -> FlashRedirect {
    let user_id = UserID::new(&form.user_id);

    let password_hash = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| get_password_hash(&user_id, &connection));

    let is_valid = match password_hash {
        Ok(Some(password_hash)) => {
            tokio::task::spawn_blocking(move || password_hash.verify(&form.password))
                .await
                .unwrap_or_else(|error| Err(Error::HashingError(error.to_string())))
        }
        Ok(None) => Ok(false),
        Err(error) => Err(error),
    };

    match is_valid {
        Ok(true) => {
            tracing::info!("User {user_id} logged in.");
            FlashRedirect::to(endpoints::HOME)
                .success(LOG_IN_SUCCESS_MSG)
                .log_in(user_id)
        }
        Ok(false) => FlashRedirect::to(endpoints::LOG_IN).error(INVALID_CREDENTIALS_ERROR_MSG),
        Err(Error::HashingError(error)) => {
            tracing::error!("Could not check the password for {user_id}: {error}");
            FlashRedirect::to(endpoints::LOG_IN).error(INVALID_CREDENTIALS_ERROR_MSG)
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            FlashRedirect::to(endpoints::LOG_IN).error(DATABASE_ERROR_MSG)
        }
    }
}
