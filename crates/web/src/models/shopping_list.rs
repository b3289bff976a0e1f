//! Shopping list domain types.

use chrono::{DateTime, Utc};

use grocer_core::ShoppingListEntryId;

use super::item::GroceryItem;

/// One row of a user's shopping list.
///
/// Adding the same item twice yields two entries with distinct ids.
#[derive(Debug, Clone)]
pub struct ShoppingListEntry {
    pub id: ShoppingListEntryId,
    pub item: GroceryItem,
    /// Title of the store that stocks the item.
    pub store_title: String,
    pub added_at: DateTime<Utc>,
}
