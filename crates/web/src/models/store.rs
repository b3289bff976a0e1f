//! Grocery store domain types.

use chrono::{DateTime, Utc};

use grocer_core::{StoreId, UserId};

/// A grocery store.
#[derive(Debug, Clone, PartialEq)]
pub struct GroceryStore {
    pub id: StoreId,
    pub title: String,
    pub address: String,
    /// User who created the store, if any (seeded stores have none).
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Validated store form data, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInput {
    /// Trimmed, 3-16 characters.
    pub title: String,
    /// Trimmed, non-empty.
    pub address: String,
}
