//! Shopping list repository.
//!
//! A shopping list is simply every `shopping_list` row for a user, in
//! insertion order. Rows are never deduplicated.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use grocer_core::{ItemId, ShoppingListEntryId, UserId};

use super::RepositoryError;
use super::items::ItemRow;
use crate::models::shopping_list::ShoppingListEntry;

#[derive(Debug, sqlx::FromRow)]
struct EntryRow {
    entry_id: i64,
    added_at: DateTime<Utc>,
    store_title: String,
    #[sqlx(flatten)]
    item: ItemRow,
}

impl TryFrom<EntryRow> for ShoppingListEntry {
    type Error = RepositoryError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ShoppingListEntryId::new(row.entry_id),
            item: row.item.try_into()?,
            store_title: row.store_title,
            added_at: row.added_at,
        })
    }
}

/// Repository for shopping list membership rows.
pub struct ShoppingListRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ShoppingListRepository<'a> {
    /// Create a new shopping list repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append an item to a user's shopping list.
    ///
    /// The insert only happens if the item exists; returns whether a row was
    /// added. Adding an item that is already on the list adds it again.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn add(&self, user_id: UserId, item_id: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO shopping_list (user_id, item_id)
            SELECT ?, id FROM grocery_item WHERE id = ?
            ",
        )
        .bind(user_id.as_i64())
        .bind(item_id.as_i64())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List a user's shopping list entries in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if an item row is invalid.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ShoppingListEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r"
            SELECT sl.id AS entry_id, sl.added_at,
                   s.title AS store_title,
                   i.id, i.name, i.price, i.category, i.photo_url,
                   i.store_id, i.created_by_id, i.created_at
            FROM shopping_list sl
            JOIN grocery_item i ON i.id = sl.item_id
            JOIN grocery_store s ON s.id = i.store_id
            WHERE sl.user_id = ?
            ORDER BY sl.id
            ",
        )
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use grocer_core::{ItemCategory, Username};

    use super::*;
    use crate::db::{ItemRepository, StoreRepository, UserRepository, test_pool};
    use crate::models::{ItemInput, StoreInput};

    struct Fixture {
        pool: SqlitePool,
        user: UserId,
        milk: ItemId,
        bread: ItemId,
    }

    async fn fixture() -> Fixture {
        let pool = test_pool().await;
        let user = UserRepository::new(&pool)
            .create(&Username::parse("alice").unwrap(), "hash")
            .await
            .unwrap()
            .id;
        let store = StoreRepository::new(&pool)
            .create(
                &StoreInput {
                    title: "Corner Mart".to_string(),
                    address: "1 Main St".to_string(),
                },
                Some(user),
            )
            .await
            .unwrap()
            .id;
        let items = ItemRepository::new(&pool);
        let mut ids = Vec::new();
        for name in ["Milk", "Bread"] {
            let item = items
                .create(
                    &ItemInput {
                        name: name.to_string(),
                        price: 2.0,
                        category: ItemCategory::Bakery,
                        photo_url: None,
                        store_id: store,
                    },
                    Some(user),
                )
                .await
                .unwrap();
            ids.push(item.id);
        }

        Fixture {
            pool,
            user,
            milk: ids[0],
            bread: ids[1],
        }
    }

    #[tokio::test]
    async fn test_duplicates_are_kept_in_order() {
        let f = fixture().await;
        let repo = ShoppingListRepository::new(&f.pool);

        assert!(repo.add(f.user, f.milk).await.unwrap());
        assert!(repo.add(f.user, f.bread).await.unwrap());
        assert!(repo.add(f.user, f.milk).await.unwrap());

        let entries = repo.list_for_user(f.user).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.item.name.as_str()).collect();
        assert_eq!(names, ["Milk", "Bread", "Milk"]);
        assert!(entries.iter().all(|e| e.store_title == "Corner Mart"));
        assert_ne!(entries[0].id, entries[2].id);
    }

    #[tokio::test]
    async fn test_add_unknown_item_is_noop() {
        let f = fixture().await;
        let repo = ShoppingListRepository::new(&f.pool);

        assert!(!repo.add(f.user, ItemId::new(1000)).await.unwrap());
        assert!(repo.list_for_user(f.user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lists_are_per_user() {
        let f = fixture().await;
        let other = UserRepository::new(&f.pool)
            .create(&Username::parse("bob").unwrap(), "hash")
            .await
            .unwrap()
            .id;
        let repo = ShoppingListRepository::new(&f.pool);

        repo.add(f.user, f.milk).await.unwrap();

        assert_eq!(repo.list_for_user(f.user).await.unwrap().len(), 1);
        assert!(repo.list_for_user(other).await.unwrap().is_empty());
    }
}
