//! Middleware that loads the session before a request and saves it afterwards.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    AppState, Error,
    session::{
        Session, SessionUpdate,
        cookie::{get_session_id_from_cookie, invalidate_session_cookie, set_session_cookie},
        store::{
            SessionRecord, delete_session, get_session, prune_expired_sessions, push_flashes,
            save_session, take_flashes,
        },
    },
};

/// The state needed for the session middleware.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a session lasts after it is created or logged in.
    pub session_duration: Duration,
    /// Whether the session cookie should only be sent over HTTPS.
    pub secure_cookies: bool,
    /// The database connection for managing sessions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SessionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_duration: state.session_duration,
            secure_cookies: state.secure_cookies,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SessionState> for Key {
    fn from_ref(state: &SessionState) -> Self {
        state.cookie_key.clone()
    }
}

/// A session loaded from the store, or a fresh one that has not been saved yet.
struct LoadedSession {
    session: Session,
    expires_at: Option<OffsetDateTime>,
}

enum CookieChange {
    Keep,
    Set(String, OffsetDateTime),
    Invalidate,
}

/// Middleware function that attaches a [Session] to every request.
///
/// A session cookie that is missing, cannot be decrypted or points at an
/// expired session starts a new anonymous session. The new session is only
/// saved, and its cookie only sent, once a handler changes it through a
/// [SessionUpdate] in the response extensions.
///
/// **Note**: Route handlers can use the function argument `Extension(session): Extension<Session>` to receive the session.
pub async fn session_layer(
    State(state): State<SessionState>,
    jar: PrivateCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let now = OffsetDateTime::now_utc();

    let loaded = match with_connection(&state, |connection| {
        load_session(get_session_id_from_cookie(&jar), now, connection)
    }) {
        Ok(loaded) => loaded,
        Err(error) => {
            tracing::error!("Could not load session: {error}");
            return error.into_response();
        }
    };

    let session_id = loaded.session.id.clone();
    request.extensions_mut().insert(loaded.session.clone());
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let Some(update) = parts.extensions.remove::<SessionUpdate>() else {
        return Response::from_parts(parts, body);
    };

    let cookie_change = match with_connection(&state, |connection| {
        apply_update(&loaded, update, &state, now, connection)
    }) {
        Ok(change) => change,
        Err(error) => {
            tracing::error!("Could not save session {session_id}: {error}");
            return error.into_response();
        }
    };

    let jar = match cookie_change {
        CookieChange::Keep => return Response::from_parts(parts, body),
        CookieChange::Set(id, expires_at) => {
            set_session_cookie(jar, &id, expires_at, state.secure_cookies)
        }
        CookieChange::Invalidate => invalidate_session_cookie(jar),
    };

    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

fn with_connection<T>(
    state: &SessionState,
    f: impl FnOnce(&Connection) -> Result<T, Error>,
) -> Result<T, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    f(&connection)
}

fn load_session(
    cookie_session_id: Option<String>,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<LoadedSession, Error> {
    let record = match cookie_session_id {
        Some(id) => get_session(&id, now, connection)?,
        None => None,
    };

    match record {
        Some(record) => {
            let flashes = take_flashes(&record.id, connection)?;

            Ok(LoadedSession {
                session: Session {
                    id: record.id,
                    user_id: record.user_id,
                    flashes,
                },
                expires_at: Some(record.expires_at),
            })
        }
        None => Ok(LoadedSession {
            session: Session {
                id: Uuid::new_v4().to_string(),
                user_id: None,
                flashes: Vec::new(),
            },
            expires_at: None,
        }),
    }
}

fn apply_update(
    loaded: &LoadedSession,
    update: SessionUpdate,
    state: &SessionState,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<CookieChange, Error> {
    if update.destroy {
        if loaded.expires_at.is_some() {
            delete_session(&loaded.session.id, connection)?;
        }

        if update.flashes.is_empty() {
            return Ok(CookieChange::Invalidate);
        }

        // Messages queued while logging out need a fresh anonymous session to live in.
        let record = SessionRecord {
            id: Uuid::new_v4().to_string(),
            user_id: None,
            expires_at: now + state.session_duration,
        };
        save_session(&record, connection)?;
        push_flashes(&record.id, &update.flashes, connection)?;

        return Ok(CookieChange::Set(record.id, record.expires_at));
    }

    let is_new = loaded.expires_at.is_none();
    let logging_in = update.log_in.is_some();
    let expires_at = match loaded.expires_at {
        Some(expires_at) if !logging_in => expires_at,
        _ => now + state.session_duration,
    };

    let record = SessionRecord {
        id: loaded.session.id.clone(),
        user_id: update.log_in.or_else(|| loaded.session.user_id.clone()),
        expires_at,
    };

    if is_new {
        let pruned = prune_expired_sessions(now, connection)?;
        if pruned > 0 {
            tracing::debug!("Pruned {pruned} expired sessions.");
        }
    }

    save_session(&record, connection)?;
    push_flashes(&record.id, &update.flashes, connection)?;

    if is_new || logging_in {
        Ok(CookieChange::Set(record.id, record.expires_at))
    } else {
        Ok(CookieChange::Keep)
    }
}
