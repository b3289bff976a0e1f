//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Store listing (public)
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (database)
//!
//! # Auth
//! GET  /signup                        - Sign-up page
//! POST /signup                        - Create account
//! GET  /login                         - Login page
//! POST /login                         - Login action
//! GET  /logout                        - Logout (requires auth)
//!
//! # Stores and items (require auth)
//! GET  /new_store                     - New store form
//! POST /new_store                     - Create store
//! GET  /store/{store_id}              - Store detail + edit form
//! POST /store/{store_id}              - Update store
//! GET  /new_item                      - New item form
//! POST /new_item                      - Create item
//! GET  /item/{item_id}                - Item detail + edit form
//! POST /item/{item_id}                - Update item
//!
//! # Shopping list (require auth)
//! POST /add_to_shopping_list/{item_id} - Append item to the list
//! GET  /shopping_list                 - Current user's list
//! ```

pub mod auth;
pub mod health;
pub mod items;
pub mod shopping_list;
pub mod stores;

use std::str::FromStr;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::{current_user, take_flash};
use crate::state::AppState;

/// Data every page needs for the shared layout.
///
/// Building it consumes the pending flash message, so build it right before
/// rendering.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Logged-in username, if any.
    pub username: Option<String>,
    /// One-shot flash message.
    pub flash: Option<String>,
}

impl Layout {
    /// Read the login state and pending flash from the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn from_session(session: &Session) -> Result<Self> {
        let username = current_user(session).await.map(|user| user.username);
        let flash = take_flash(session).await?;
        Ok(Self { username, flash })
    }
}

/// Parse an ID path segment, treating anything unparseable as not found.
fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("{what} {raw}")))
}

/// Create the main application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Auth
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        // Stores
        .route(
            "/new_store",
            get(stores::new_store_page).post(stores::create_store),
        )
        .route(
            "/store/{store_id}",
            get(stores::store_detail).post(stores::update_store),
        )
        // Items
        .route("/new_item", get(items::new_item_page).post(items::create_item))
        .route(
            "/item/{item_id}",
            get(items::item_detail).post(items::update_item),
        )
        // Shopping list
        .route(
            "/add_to_shopping_list/{item_id}",
            post(shopping_list::add_to_shopping_list),
        )
        .route("/shopping_list", get(shopping_list::shopping_list))
}
