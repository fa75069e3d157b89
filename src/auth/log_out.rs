use crate::{endpoints, session::FlashRedirect};

/// Invalidate the session and redirect the client to the log-in page.
pub async fn get_log_out() -> FlashRedirect {
    FlashRedirect::to(endpoints::LOG_IN).destroy_session()
}
