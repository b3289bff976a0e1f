//! Seed the database with demo stores and items.
//!
//! Seeded rows have no creator. Seeding is skipped if any store exists, so
//! the command can be run repeatedly.

use tracing::info;

use grocer_core::ItemCategory;
use grocer_web::db::{ItemRepository, RepositoryError, StoreRepository};
use grocer_web::models::{ItemInput, StoreInput};
use sqlx::SqlitePool;

use super::connect;

/// Demo stores and the items each one carries.
const DEMO_DATA: &[(&str, &str, &[(&str, f64, ItemCategory)])] = &[
    (
        "Corner Mart",
        "1 Main St",
        &[
            ("Milk", 3.5, ItemCategory::Other),
            ("Sourdough", 6.0, ItemCategory::Bakery),
            ("Bananas", 0.79, ItemCategory::Produce),
        ],
    ),
    (
        "Fresh Fields",
        "42 Orchard Rd",
        &[
            ("Turkey Slices", 5.25, ItemCategory::Deli),
            ("Frozen Peas", 2.1, ItemCategory::Frozen),
            ("Basmati Rice", 4.0, ItemCategory::Pantry),
        ],
    ),
];

/// Insert the demo data.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    grocer_web::db::migrate(&pool).await?;

    let (stores, items) = seed(&pool).await?;
    if stores == 0 {
        info!("Stores already present, nothing seeded");
    } else {
        info!(stores, items, "Seeding complete");
    }
    Ok(())
}

/// Insert demo stores and items unless the database already has stores.
///
/// Returns the number of stores and items inserted.
async fn seed(pool: &SqlitePool) -> Result<(usize, usize), RepositoryError> {
    let store_repo = StoreRepository::new(pool);
    if !store_repo.list_all().await?.is_empty() {
        return Ok((0, 0));
    }

    let item_repo = ItemRepository::new(pool);
    let mut item_count = 0;

    for (title, address, items) in DEMO_DATA {
        let store = store_repo
            .create(
                &StoreInput {
                    title: (*title).to_owned(),
                    address: (*address).to_owned(),
                },
                None,
            )
            .await?;
        info!(store_id = %store.id, title, "Seeded store");

        for (name, price, category) in *items {
            item_repo
                .create(
                    &ItemInput {
                        name: (*name).to_owned(),
                        price: *price,
                        category: *category,
                        photo_url: None,
                        store_id: store.id,
                    },
                    None,
                )
                .await?;
            item_count += 1;
        }
    }

    Ok((DEMO_DATA.len(), item_count))
}
