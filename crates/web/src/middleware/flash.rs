//! One-shot flash messages stored in the session.
//!
//! A message set while handling one request is shown on the next page that
//! renders, then removed.

use tower_sessions::Session;

use crate::models::session::keys;

/// Queue a flash message for the next rendered page.
///
/// A later message replaces an earlier one that was never shown.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::FLASH, message.into()).await
}

/// Take the pending flash message, if any.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn take_flash(session: &Session) -> Result<Option<String>, tower_sessions::session::Error> {
    session.remove::<String>(keys::FLASH).await
}
