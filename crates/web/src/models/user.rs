//! User domain types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use grocer_core::{UserId, Username};

/// A registered user (domain type).
///
/// The password hash never leaves the repository layer as part of this type.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique username.
    pub username: Username,
    /// When the user signed up.
    pub created_at: DateTime<Utc>,
}

/// Validated sign-up payload.
#[derive(Debug)]
pub struct NewUser {
    pub username: Username,
    pub password: SecretString,
}
