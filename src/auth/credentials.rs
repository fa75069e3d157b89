//! Registers users and checks their passwords at log-in.

use rusqlite::Connection;

use crate::{
    Error,
    auth::{
        PasswordHash, User, UserID, ValidatedPassword,
        user::{create_user, get_user_by_id},
    },
};

/// A checked and hashed sign-up that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub user_id: UserID,
    pub username: String,
    pub password_hash: PasswordHash,
}

/// Check the sign-up fields and hash `raw_password`.
///
/// Hashing is slow at real bcrypt costs and needs no database access, so callers
/// should run this without holding the database lock.
///
/// # Errors
///
/// Returns a:
/// - [Error::EmptyField] if any of `user_id`, `username` or `raw_password` is empty,
/// - or [Error::HashingError] if the password could not be hashed.
pub fn hash_registration(
    user_id: &str,
    username: &str,
    raw_password: &str,
    cost: u32,
) -> Result<Registration, Error> {
    if user_id.is_empty() {
        return Err(Error::EmptyField("userId"));
    }

    if username.is_empty() {
        return Err(Error::EmptyField("username"));
    }

    let password = ValidatedPassword::new(raw_password)?;
    let password_hash = PasswordHash::new(password, cost)?;

    Ok(Registration {
        user_id: UserID::new(user_id),
        username: username.to_owned(),
        password_hash,
    })
}

/// Store a hashed sign-up as a new user.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateUser] if the user ID or username is already registered,
/// - or [Error::SqlError] if some other SQL error occurred.
pub fn save_registration(registration: Registration, connection: &Connection) -> Result<User, Error> {
    create_user(
        registration.user_id,
        &registration.username,
        registration.password_hash,
        connection,
    )
}

/// Hash `raw_password` and store a new user.
///
/// `cost` is the bcrypt cost, use [PasswordHash::DEFAULT_COST] outside of tests.
///
/// # Errors
///
/// See [hash_registration] and [save_registration].
pub fn register(
    user_id: &str,
    username: &str,
    raw_password: &str,
    cost: u32,
    connection: &Connection,
) -> Result<User, Error> {
    let registration = hash_registration(user_id, username, raw_password, cost)?;

    save_registration(registration, connection)
}

/// Get the stored password hash for `user_id`, or `None` for an unknown user.
///
/// # Errors
///
/// Returns an [Error::SqlError] if the user could not be loaded.
pub fn get_password_hash(
    user_id: &UserID,
    connection: &Connection,
) -> Result<Option<PasswordHash>, Error> {
    match get_user_by_id(user_id, connection) {
        Ok(user) => Ok(Some(user.password_hash)),
        Err(Error::NotFound) => Ok(None),
        Err(error) => Err(error),
    }
}

/// Check whether `raw_password` is the password of the user with `user_id`.
///
/// An unknown user ID is reported the same way as a wrong password.
///
/// # Errors
///
/// Returns a:
/// - [Error::HashingError] if the stored hash could not be checked,
/// - or [Error::SqlError] if the user could not be loaded.
pub fn verify(user_id: &UserID, raw_password: &str, connection: &Connection) -> Result<bool, Error> {
    match get_password_hash(user_id, connection)? {
        Some(password_hash) => password_hash.verify(raw_password),
        None => Ok(false),
    }
}
