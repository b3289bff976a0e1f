//! Shopping list route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use grocer_core::ItemId;

use super::Layout;
use crate::db::ShoppingListRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::ShoppingListEntry;
use crate::state::AppState;

const SHOPPING_LIST_PATH: &str = "/shopping_list";

/// Shopping list page template.
#[derive(Template, WebTemplate)]
#[template(path = "shopping_list.html")]
pub struct ShoppingListTemplate {
    pub layout: Layout,
    pub entries: Vec<ShoppingListEntry>,
}

/// Append an item to the current user's shopping list.
///
/// Unknown or malformed item IDs are ignored; the user always lands on the
/// list.
pub async fn add_to_shopping_list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<String>,
) -> Result<Redirect> {
    match item_id.parse::<ItemId>() {
        Ok(item_id) => {
            let added = ShoppingListRepository::new(state.pool())
                .add(user.id, item_id)
                .await?;
            if added {
                tracing::info!(user_id = %user.id, %item_id, "Item added to shopping list");
            } else {
                tracing::debug!(user_id = %user.id, %item_id, "Unknown item, shopping list unchanged");
            }
        }
        Err(_) => {
            tracing::debug!(user_id = %user.id, %item_id, "Malformed item id ignored");
        }
    }

    Ok(Redirect::to(SHOPPING_LIST_PATH))
}

/// Show the current user's shopping list, duplicates included.
pub async fn shopping_list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<Response> {
    let entries = ShoppingListRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(ShoppingListTemplate {
        layout: Layout::from_session(&session).await?,
        entries,
    }
    .into_response())
}
