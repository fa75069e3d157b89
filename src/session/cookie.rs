//! Defines functions for carrying the session ID in a private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

pub(crate) const COOKIE_SESSION_ID: &str = "session_id";

/// Add the session cookie to the cookie jar.
///
/// The cookie expires at `expiry`, the same time as the session in the store.
///
/// Returns the cookie jar with the cookie added.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    session_id: &str,
    expiry: OffsetDateTime,
    secure: bool,
) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION_ID, session_id.to_owned()))
            .path("/")
            .expires(expiry)
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure),
    )
}

/// Set the session cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION_ID, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Get the session ID from the session cookie, if the cookie is present and could be decrypted.
pub(crate) fn get_session_id_from_cookie(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(COOKIE_SESSION_ID)
        .map(|cookie| cookie.value_trimmed().to_owned())
}
