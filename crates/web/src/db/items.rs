//! Grocery item repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use grocer_core::{ItemCategory, ItemId, StoreId, UserId};

use super::RepositoryError;
use crate::models::item::{GroceryItem, ItemInput};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ItemRow {
    id: i64,
    name: String,
    price: f64,
    category: String,
    photo_url: Option<String>,
    store_id: i64,
    created_by_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for GroceryItem {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let category = ItemCategory::from_key(&row.category)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: ItemId::new(row.id),
            name: row.name,
            price: row.price,
            category,
            photo_url: row.photo_url,
            store_id: StoreId::new(row.store_id),
            created_by: row.created_by_id.map(UserId::new),
            created_at: row.created_at,
        })
    }
}

/// Map a foreign key failure on `store_id` to a conflict.
fn conflict_on_missing_store(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::Conflict("store does not exist".to_owned());
    }
    RepositoryError::Database(e)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for grocery item database operations.
pub struct ItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored category is unknown.
    pub async fn get_by_id(&self, id: ItemId) -> Result<Option<GroceryItem>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT id, name, price, category, photo_url, store_id, created_by_id, created_at
            FROM grocery_item
            WHERE id = ?
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List the items a store carries, in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored category is unknown.
    pub async fn list_by_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<GroceryItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT id, name, price, category, photo_url, store_id, created_by_id, created_at
            FROM grocery_item
            WHERE store_id = ?
            ORDER BY id
            ",
        )
        .bind(store_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Create a new item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the referenced store does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        input: &ItemInput,
        created_by: Option<UserId>,
    ) -> Result<GroceryItem, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            INSERT INTO grocery_item (name, price, category, photo_url, store_id, created_by_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, price, category, photo_url, store_id, created_by_id, created_at
            ",
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(input.category.key())
        .bind(input.photo_url.as_deref())
        .bind(input.store_id.as_i64())
        .bind(created_by.map(|id| id.as_i64()))
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_missing_store)?;

        row.try_into()
    }

    /// Overwrite every editable field of an item in a single statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no item has this ID.
    /// Returns `RepositoryError::Conflict` if the new store does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ItemId,
        input: &ItemInput,
    ) -> Result<GroceryItem, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            UPDATE grocery_item
            SET name = ?, price = ?, category = ?, photo_url = ?, store_id = ?
            WHERE id = ?
            RETURNING id, name, price, category, photo_url, store_id, created_by_id, created_at
            ",
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(input.category.key())
        .bind(input.photo_url.as_deref())
        .bind(input.store_id.as_i64())
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_missing_store)?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}
