//! The database tables and queries behind sessions and their flash messages.

use rusqlite::{Connection, OptionalExtension, Row, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    session::{Flash, FlashKind},
};

/// A session as stored in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    /// The random ID carried by the session cookie.
    pub id: String,
    /// The logged in user, `None` for anonymous sessions.
    pub user_id: Option<UserID>,
    /// When the session stops being valid.
    pub expires_at: OffsetDateTime,
}

/// Create the session table.
///
/// Expiry times are stored as Unix timestamps so they can be compared in SQL.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_session_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS session (
                id TEXT PRIMARY KEY,
                userId TEXT,
                expires_at INTEGER NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create the table for flash messages.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_flash_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS flash (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                message TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Get the session with `id` if it exists and has not expired at `now`.
///
/// # Errors
///
/// Returns a [Error::SqlError] if the query failed.
pub fn get_session(
    id: &str,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Option<SessionRecord>, Error> {
    connection
        .prepare("SELECT id, userId, expires_at FROM session WHERE id = ?1 AND expires_at > ?2")?
        .query_row((id, now.unix_timestamp()), map_session_row)
        .optional()
        .map_err(Error::from)
}

/// Insert `session`, or overwrite the user and expiry of an existing session with the same ID.
///
/// # Errors
///
/// Returns a [Error::SqlError] if the query failed.
pub fn save_session(session: &SessionRecord, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO session (id, userId, expires_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET userId = excluded.userId, expires_at = excluded.expires_at",
        (
            &session.id,
            session.user_id.as_ref().map(UserID::as_str),
            session.expires_at.unix_timestamp(),
        ),
    )?;

    Ok(())
}

/// Delete the session with `id` along with any unread flash messages.
///
/// # Errors
///
/// Returns a [Error::SqlError] if the query failed.
pub fn delete_session(id: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM flash WHERE session_id = ?1", (id,))?;
    connection.execute("DELETE FROM session WHERE id = ?1", (id,))?;

    Ok(())
}

/// Delete every session that expired at or before `now`.
///
/// Returns the number of sessions deleted.
///
/// # Errors
///
/// Returns a [Error::SqlError] if the query failed.
pub fn prune_expired_sessions(now: OffsetDateTime, connection: &Connection) -> Result<usize, Error> {
    let now = now.unix_timestamp();

    connection.execute(
        "DELETE FROM flash WHERE session_id IN (SELECT id FROM session WHERE expires_at <= ?1)",
        (now,),
    )?;

    connection
        .execute("DELETE FROM session WHERE expires_at <= ?1", (now,))
        .map_err(Error::from)
}

/// Queue `flashes` for the next page shown in the session `session_id`.
///
/// # Errors
///
/// Returns a [Error::SqlError] if the query failed.
pub fn push_flashes(session_id: &str, flashes: &[Flash], connection: &Connection) -> Result<(), Error> {
    let mut statement =
        connection.prepare("INSERT INTO flash (session_id, kind, message) VALUES (?1, ?2, ?3)")?;

    for flash in flashes {
        statement.execute((session_id, flash.kind.as_str(), &flash.message))?;
    }

    Ok(())
}

/// Remove and return the queued flash messages for `session_id`, oldest first.
///
/// # Errors
///
/// Returns a [Error::SqlError] if the query failed.
pub fn take_flashes(session_id: &str, connection: &Connection) -> Result<Vec<Flash>, Error> {
    let flashes = connection
        .prepare("SELECT kind, message FROM flash WHERE session_id = ?1 ORDER BY id")?
        .query_map((session_id,), map_flash_row)?
        .collect::<Result<Vec<_>, _>>()?;

    if !flashes.is_empty() {
        connection.execute("DELETE FROM flash WHERE session_id = ?1", (session_id,))?;
    }

    Ok(flashes)
}

fn map_session_row(row: &Row) -> Result<SessionRecord, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_user_id: Option<String> = row.get(1)?;
    let raw_expires_at: i64 = row.get(2)?;

    let expires_at = OffsetDateTime::from_unix_timestamp(raw_expires_at).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(2, Type::Integer, Box::new(error))
    })?;

    Ok(SessionRecord {
        id,
        user_id: raw_user_id.as_deref().map(UserID::new),
        expires_at,
    })
}

fn map_flash_row(row: &Row) -> Result<Flash, rusqlite::Error> {
    let raw_kind: String = row.get(0)?;
    let message = row.get(1)?;

    let kind = FlashKind::parse(&raw_kind).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            format!("unknown flash kind {raw_kind:?}").into(),
        )
    })?;

    Ok(Flash { kind, message })
}
