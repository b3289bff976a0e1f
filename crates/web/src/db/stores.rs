//! Grocery store repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use grocer_core::{StoreId, UserId};

use super::RepositoryError;
use crate::models::store::{GroceryStore, StoreInput};

#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: i64,
    title: String,
    address: String,
    created_by_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl From<StoreRow> for GroceryStore {
    fn from(row: StoreRow) -> Self {
        Self {
            id: StoreId::new(row.id),
            title: row.title,
            address: row.address,
            created_by: row.created_by_id.map(UserId::new),
            created_at: row.created_at,
        }
    }
}

/// Repository for grocery store database operations.
pub struct StoreRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all stores in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<GroceryStore>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, title, address, created_by_id, created_at
            FROM grocery_store
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a store by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: StoreId) -> Result<Option<GroceryStore>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, title, address, created_by_id, created_at
            FROM grocery_store
            WHERE id = ?
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a new store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        input: &StoreInput,
        created_by: Option<UserId>,
    ) -> Result<GroceryStore, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            INSERT INTO grocery_store (title, address, created_by_id)
            VALUES (?, ?, ?)
            RETURNING id, title, address, created_by_id, created_at
            ",
        )
        .bind(&input.title)
        .bind(&input.address)
        .bind(created_by.map(|id| id.as_i64()))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Overwrite a store's title and address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no store has this ID.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: StoreId,
        input: &StoreInput,
    ) -> Result<GroceryStore, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            UPDATE grocery_store
            SET title = ?, address = ?
            WHERE id = ?
            RETURNING id, title, address, created_by_id, created_at
            ",
        )
        .bind(&input.title)
        .bind(&input.address)
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn input(title: &str, address: &str) -> StoreInput {
        StoreInput {
            title: title.to_string(),
            address: address.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let repo = StoreRepository::new(&pool);

        let store = repo
            .create(&input("Corner Mart", "1 Main St"), None)
            .await
            .unwrap();
        let fetched = repo.get_by_id(store.id).await.unwrap().unwrap();

        assert_eq!(fetched, store);
        assert_eq!(fetched.title, "Corner Mart");
        assert_eq!(fetched.address, "1 Main St");
        assert!(fetched.created_by.is_none());
    }

    #[tokio::test]
    async fn test_list_all_in_id_order() {
        let pool = test_pool().await;
        let repo = StoreRepository::new(&pool);

        for title in ["Zed Foods", "Aldi", "Mart"] {
            repo.create(&input(title, "somewhere"), None).await.unwrap();
        }

        let titles: Vec<_> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, ["Zed Foods", "Aldi", "Mart"]);
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let pool = test_pool().await;
        let repo = StoreRepository::new(&pool);

        let store = repo.create(&input("Old", "Old St"), None).await.unwrap();
        let updated = repo
            .update(store.id, &input("New Name", "2 New St"))
            .await
            .unwrap();

        assert_eq!(updated.id, store.id);
        assert_eq!(updated.title, "New Name");
        assert_eq!(updated.address, "2 New St");
        assert_eq!(updated.created_at, store.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_store() {
        let pool = test_pool().await;
        let repo = StoreRepository::new(&pool);

        let err = repo
            .update(StoreId::new(7), &input("Nope", "Nowhere"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

}
