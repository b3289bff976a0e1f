//! Grocery item domain types.

use chrono::{DateTime, Utc};

use grocer_core::{ItemCategory, ItemId, StoreId, UserId};

/// A grocery item stocked by exactly one store.
#[derive(Debug, Clone, PartialEq)]
pub struct GroceryItem {
    pub id: ItemId,
    pub name: String,
    /// Non-negative and finite.
    pub price: f64,
    pub category: ItemCategory,
    /// Absolute http(s) URL, if the item has a photo.
    pub photo_url: Option<String>,
    pub store_id: StoreId,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Validated item form data, used for both create and update.
///
/// Every field is overwritten on update, including the store the item
/// belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInput {
    pub name: String,
    pub price: f64,
    pub category: ItemCategory,
    pub photo_url: Option<String>,
    pub store_id: StoreId,
}
