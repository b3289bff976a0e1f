//! Grocery item route handlers (create, detail, update).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use grocer_core::ItemId;

use super::{Layout, parse_id};
use crate::db::{ItemRepository, RepositoryError, StoreRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::forms::{FieldErrors, ItemForm, SelectOption};
use crate::middleware::{RequireAuth, set_flash};
use crate::models::{GroceryItem, GroceryStore};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Item form state shared by the create and detail pages.
pub struct ItemFormView {
    pub form: ItemForm,
    pub errors: FieldErrors,
    pub category_options: Vec<SelectOption>,
    pub store_options: Vec<SelectOption>,
}

impl ItemFormView {
    fn new(form: ItemForm, errors: FieldErrors, stores: &[GroceryStore]) -> Self {
        Self {
            category_options: form.category_options(),
            store_options: form.store_options(stores),
            form,
            errors,
        }
    }
}

/// New item page template.
#[derive(Template, WebTemplate)]
#[template(path = "new_item.html")]
pub struct NewItemTemplate {
    pub layout: Layout,
    pub view: ItemFormView,
}

/// Item detail page template, including the edit form.
#[derive(Template, WebTemplate)]
#[template(path = "item_detail.html")]
pub struct ItemDetailTemplate {
    pub layout: Layout,
    pub item: GroceryItem,
    pub store: GroceryStore,
    pub view: ItemFormView,
}

fn item_path(id: ItemId) -> String {
    format!("/item/{id}")
}

async fn find_item(state: &AppState, raw_id: &str) -> Result<GroceryItem> {
    let id: ItemId = parse_id(raw_id, "item")?;
    ItemRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {id}")))
}

async fn render_detail(
    state: &AppState,
    session: &Session,
    item: GroceryItem,
    form: ItemForm,
    errors: FieldErrors,
) -> Result<Response> {
    let stores = StoreRepository::new(state.pool()).list_all().await?;
    let store = stores
        .iter()
        .find(|s| s.id == item.store_id)
        .cloned()
        .ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "item {} references missing store {}",
                item.id, item.store_id
            ))
        })?;

    Ok(ItemDetailTemplate {
        layout: Layout::from_session(session).await?,
        view: ItemFormView::new(form, errors, &stores),
        item,
        store,
    }
    .into_response())
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the new item form.
pub async fn new_item_page(
    State(state): State<AppState>,
    _auth: RequireAuth,
    session: Session,
) -> Result<Response> {
    let stores = StoreRepository::new(state.pool()).list_all().await?;

    Ok(NewItemTemplate {
        layout: Layout::from_session(&session).await?,
        view: ItemFormView::new(ItemForm::default(), FieldErrors::default(), &stores),
    }
    .into_response())
}

/// Create an item owned by the current user.
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    let stores = StoreRepository::new(state.pool()).list_all().await?;

    let input = match form.validate(&stores) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(NewItemTemplate {
                layout: Layout::from_session(&session).await?,
                view: ItemFormView::new(form, errors, &stores),
            }
            .into_response());
        }
    };

    let item = ItemRepository::new(state.pool())
        .create(&input, Some(user.id))
        .await?;

    let item_id = item.id.to_string();
    tracing::info!(%item_id, store_id = %item.store_id, "Item created");
    add_breadcrumb("item", "Created item", Some(&[("item_id", item_id.as_str())][..]));
    set_flash(&session, "New Grocery Item succesfully created!").await?;

    Ok(Redirect::to(&item_path(item.id)).into_response())
}

/// Show an item with its store, category and photo, plus the edit form.
pub async fn item_detail(
    State(state): State<AppState>,
    _auth: RequireAuth,
    session: Session,
    Path(item_id): Path<String>,
) -> Result<Response> {
    let item = find_item(&state, &item_id).await?;
    let form = ItemForm::from_item(&item);

    render_detail(&state, &session, item, form, FieldErrors::default()).await
}

/// Overwrite every editable field of an item, including its store.
///
/// Any logged-in user may edit any item.
#[tracing::instrument(skip_all, fields(user_id = %user.id, item_id = %item_id))]
pub async fn update_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(item_id): Path<String>,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    let item = find_item(&state, &item_id).await?;
    let stores = StoreRepository::new(state.pool()).list_all().await?;

    let input = match form.validate(&stores) {
        Ok(input) => input,
        Err(errors) => return render_detail(&state, &session, item, form, errors).await,
    };

    let item = ItemRepository::new(state.pool())
        .update(item.id, &input)
        .await?;

    tracing::info!("Item updated");
    set_flash(&session, "Grocery Item succesfully updated!").await?;

    Ok(Redirect::to(&item_path(item.id)).into_response())
}
