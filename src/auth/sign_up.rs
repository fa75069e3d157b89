//! The sign-up page, the root page that shows it to anonymous visitors, and
//! the handler that registers new users.

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
    auth::{hash_registration, save_registration},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base, link, log_in_register, password_input, required_input},
    item::{FETCH_ERROR_MSG, count_items},
    session::{Flash, FlashRedirect, Session},
};

pub const EMPTY_FIELD_ERROR_MSG: &str = "Invalid input. All fields are required.";
pub const DUPLICATE_USER_ERROR_MSG: &str = "User ID or username already exists.";
pub const UNEXPECTED_ERROR_MSG: &str = "An unexpected error occurred. Please try again.";
pub const SIGN_UP_SUCCESS_MSG: &str = "New user registered successfully.";

fn sign_up_form() -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::SIGN_UP)
            class="space-y-4 md:space-y-6"
        {
            (required_input("userId", "User ID", "text", ""))
            (required_input("username", "Username", "text", ""))
            (password_input())

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Sign up"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN, "Log in here"))
            }
        }
    }
}

fn sign_up_view(flashes: &[Flash], item_count: Option<i64>) -> Markup {
    let form = html! {
        @if let Some(item_count) = item_count
        {
            p id="item-count" class="text-sm text-gray-500 dark:text-gray-400"
            {
                (item_count) " spends recorded so far."
            }
        }

        (sign_up_form())
    };
    let content = log_in_register("Create an account", flashes, &form);

    base("Sign Up", &content)
}

/// The state needed for the sign-up routes.
#[derive(Debug, Clone)]
pub struct SignUpState {
    /// The bcrypt cost used when hashing new passwords.
    pub password_cost: u32,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_cost: state.password_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The root page sends logged in users home and shows everyone else the
/// sign-up form along with how many spends have been recorded.
pub async fn get_root_page(
    State(state): State<SignUpState>,
    Extension(session): Extension<Session>,
) -> Response {
    if session.is_authenticated() {
        return Redirect::to(endpoints::HOME).into_response();
    }

    let count = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| count_items(&connection));

    match count {
        Ok(count) => sign_up_view(&session.flashes, Some(count)).into_response(),
        Err(error) => {
            tracing::error!("Could not count spends: {error}");
            FlashRedirect::to(endpoints::INTERNAL_ERROR_VIEW)
                .error(FETCH_ERROR_MSG)
                .into_response()
        }
    }
}

/// Display the sign-up page, or send logged in users to the home page.
pub async fn get_sign_up_page(Extension(session): Extension<Session>) -> Response {
    if session.is_authenticated() {
        return Redirect::to(endpoints::HOME).into_response();
    }

    sign_up_view(&session.flashes, None).into_response()
}

/// The raw data entered by the user in the sign-up form.
#[derive(Deserialize)]
pub struct SignUpForm {
    /// The ID the user will log in with.
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    pub password: String,
}

/// Register a new user and send them to the log-in page.
///
/// The password is hashed on the blocking pool and the database lock is only
/// taken for the insert. Any failure sends the client back to the sign-up page
/// with a flash message.
pub async fn post_sign_up(
    State(state): State<SignUpState>,
    Form(form): Form<SignUpForm>,
) -> FlashRedirect {
    let password_cost = state.password_cost;
    let registration = tokio::task::spawn_blocking(move || {
        hash_registration(&form.user_id, &form.username, &form.password, password_cost)
    })
    .await
    .unwrap_or_else(|error| Err(Error::HashingError(error.to_string())));

    let user = registration.and_then(|registration| {
        state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
            .and_then(|connection| save_registration(registration, &connection))
    });

    match user {
        Ok(user) => {
            tracing::info!("Registered user {}.", user.id);
            FlashRedirect::to(endpoints::LOG_IN).success(SIGN_UP_SUCCESS_MSG)
        }
        Err(Error::EmptyField(field)) => {
            tracing::debug!("Sign-up rejected, {field} was empty.");
            FlashRedirect::to(endpoints::SIGN_UP).error(EMPTY_FIELD_ERROR_MSG)
        }
        Err(Error::DuplicateUser) => {
            FlashRedirect::to(endpoints::SIGN_UP).error(DUPLICATE_USER_ERROR_MSG)
        }
        Err(error) => {
            tracing::error!("Could not register user: {error}");
            FlashRedirect::to(endpoints::SIGN_UP).error(UNEXPECTED_ERROR_MSG)
        }
    }
}
