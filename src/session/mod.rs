//! Server-side sessions stored in the database and keyed by a private cookie.
//!
//! The [session_layer] middleware loads the session for every request and hands
//! route handlers a [Session] through the request extensions. Handlers that
//! need to change the session (log in, log out, queue flash messages) return a
//! [FlashRedirect], which carries a [SessionUpdate] back to the middleware in
//! the response extensions.

mod cookie;
mod flash;
mod middleware;
mod redirect;
mod store;

use time::{Duration, OffsetDateTime};

pub use flash::{Flash, FlashKind};
pub use middleware::session_layer;
pub use redirect::FlashRedirect;
pub use store::{create_flash_table, create_session_table};

use crate::{Error, auth::UserID};

/// How long a session lasts after it is created or logged in.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::days(7);

/// The session attached to the current request.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// The ID carried by the session cookie.
    pub id: String,
    /// The logged in user, `None` while anonymous.
    pub user_id: Option<UserID>,
    /// Flash messages queued by the previous request, to be shown on this page.
    pub flashes: Vec<Flash>,
}

impl Session {
    /// Whether a user has logged in with this session.
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// The changes a handler wants made to its session once the response is ready.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionUpdate {
    /// Mark the session as logged in by this user.
    pub log_in: Option<UserID>,
    /// Delete the session and its cookie.
    pub destroy: bool,
    /// Messages to show on the next page.
    pub flashes: Vec<Flash>,
}

impl SessionUpdate {
    fn is_empty(&self) -> bool {
        self.log_in.is_none() && !self.destroy && self.flashes.is_empty()
    }
}

/// Delete sessions that expired before now.
///
/// # Errors
///
/// Returns a [Error::SqlError] if the query failed.
pub fn prune_expired_sessions(connection: &rusqlite::Connection) -> Result<usize, Error> {
    store::prune_expired_sessions(OffsetDateTime::now_utc(), connection)
}
