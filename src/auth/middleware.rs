//! Authentication middleware that turns away anonymous sessions.

use axum::{
    Extension,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    endpoints,
    session::{FlashRedirect, Session},
};

/// The flash shown when an anonymous user opens a protected page.
pub const LOG_IN_FIRST_MSG: &str = "Please log in first.";

/// Middleware function that checks the session has a logged in user.
///
/// The user ID is placed into the request and the request executed normally
/// if the session is authenticated, otherwise the client is redirected to the
/// log-in page with a flash message.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
///
/// **Note**: This middleware must run inside [crate::session::session_layer],
/// which provides the [Session].
pub async fn auth_guard(
    Extension(session): Extension<Session>,
    mut request: Request,
    next: Next,
) -> Response {
    match session.user_id {
        Some(user_id) => {
            request.extensions_mut().insert(user_id);
            next.run(request).await
        }
        None => {
            tracing::debug!(
                "Anonymous request to {} redirected to log in.",
                request.uri().path()
            );
            FlashRedirect::to(endpoints::LOG_IN)
                .error(LOG_IN_FIRST_MSG)
                .into_response()
        }
    }
}
