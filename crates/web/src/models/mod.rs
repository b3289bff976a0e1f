//! Domain models.
//!
//! These types represent validated domain objects separate from database row
//! types, plus the validated inputs the forms produce.

pub mod item;
pub mod session;
pub mod shopping_list;
pub mod store;
pub mod user;

pub use item::{GroceryItem, ItemInput};
pub use session::CurrentUser;
pub use shopping_list::ShoppingListEntry;
pub use store::{GroceryStore, StoreInput};
pub use user::{NewUser, User};
