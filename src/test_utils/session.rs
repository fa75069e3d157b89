use axum::{body::Body, http::StatusCode, response::Response};
use rusqlite::Connection;

use crate::{
    AppState,
    auth::UserID,
    session::{Session, SessionUpdate},
};

use super::get_header;

pub(crate) fn get_test_app_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(connection, "foobar")
        .expect("Could not create app state")
        .with_password_cost(4)
}

pub(crate) fn anonymous_session() -> Session {
    Session {
        id: "anonymous".to_owned(),
        user_id: None,
        flashes: Vec::new(),
    }
}

pub(crate) fn logged_in_session(user_id: &str) -> Session {
    Session {
        id: format!("session-{user_id}"),
        user_id: Some(UserID::new(user_id)),
        flashes: Vec::new(),
    }
}

/// The changes a handler asked the session layer to make, if any.
pub(crate) fn get_session_update(response: &Response<Body>) -> Option<SessionUpdate> {
    response.extensions().get::<SessionUpdate>().cloned()
}

#[track_caller]
pub(crate) fn assert_redirect(response: &Response<Body>, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(get_header(response, "location"), location);
}
