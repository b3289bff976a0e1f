//! Grocery store route handlers (home page, create, detail, update).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use grocer_core::StoreId;

use super::{Layout, parse_id};
use crate::db::{ItemRepository, StoreRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::forms::{FieldErrors, StoreForm};
use crate::middleware::{RequireAuth, set_flash};
use crate::models::{GroceryItem, GroceryStore};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Home page template: every store.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub stores: Vec<GroceryStore>,
}

/// New store page template.
#[derive(Template, WebTemplate)]
#[template(path = "new_store.html")]
pub struct NewStoreTemplate {
    pub layout: Layout,
    pub form: StoreForm,
    pub errors: FieldErrors,
}

/// Store detail page template, including the edit form.
#[derive(Template, WebTemplate)]
#[template(path = "store_detail.html")]
pub struct StoreDetailTemplate {
    pub layout: Layout,
    pub store: GroceryStore,
    pub items: Vec<GroceryItem>,
    pub form: StoreForm,
    pub errors: FieldErrors,
}

fn store_path(id: StoreId) -> String {
    format!("/store/{id}")
}

async fn find_store(state: &AppState, raw_id: &str) -> Result<GroceryStore> {
    let id: StoreId = parse_id(raw_id, "store")?;
    StoreRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))
}

async fn render_detail(
    state: &AppState,
    session: &Session,
    store: GroceryStore,
    form: StoreForm,
    errors: FieldErrors,
) -> Result<Response> {
    let items = ItemRepository::new(state.pool())
        .list_by_store(store.id)
        .await?;

    Ok(StoreDetailTemplate {
        layout: Layout::from_session(session).await?,
        store,
        items,
        form,
        errors,
    }
    .into_response())
}

// =============================================================================
// Handlers
// =============================================================================

/// List all stores.
pub async fn home(State(state): State<AppState>, session: Session) -> Result<Response> {
    let stores = StoreRepository::new(state.pool()).list_all().await?;

    Ok(HomeTemplate {
        layout: Layout::from_session(&session).await?,
        stores,
    }
    .into_response())
}

/// Display the new store form.
pub async fn new_store_page(_auth: RequireAuth, session: Session) -> Result<Response> {
    Ok(NewStoreTemplate {
        layout: Layout::from_session(&session).await?,
        form: StoreForm::default(),
        errors: FieldErrors::default(),
    }
    .into_response())
}

/// Create a store owned by the current user.
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_store(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<StoreForm>,
) -> Result<Response> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(NewStoreTemplate {
                layout: Layout::from_session(&session).await?,
                form,
                errors,
            }
            .into_response());
        }
    };

    let store = StoreRepository::new(state.pool())
        .create(&input, Some(user.id))
        .await?;

    let store_id = store.id.to_string();
    tracing::info!(%store_id, "Store created");
    add_breadcrumb("store", "Created store", Some(&[("store_id", store_id.as_str())][..]));
    set_flash(&session, "New Grocery Store succesfully created!").await?;

    Ok(Redirect::to(&store_path(store.id)).into_response())
}

/// Show a store, its items, and the edit form.
pub async fn store_detail(
    State(state): State<AppState>,
    _auth: RequireAuth,
    session: Session,
    Path(store_id): Path<String>,
) -> Result<Response> {
    let store = find_store(&state, &store_id).await?;
    let form = StoreForm::from_store(&store);

    render_detail(&state, &session, store, form, FieldErrors::default()).await
}

/// Overwrite a store's title and address.
///
/// Any logged-in user may edit any store.
#[tracing::instrument(skip_all, fields(user_id = %user.id, store_id = %store_id))]
pub async fn update_store(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(store_id): Path<String>,
    Form(form): Form<StoreForm>,
) -> Result<Response> {
    let store = find_store(&state, &store_id).await?;

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return render_detail(&state, &session, store, form, errors).await,
    };

    let store = StoreRepository::new(state.pool())
        .update(store.id, &input)
        .await?;

    tracing::info!("Store updated");
    set_flash(&session, "Grocery Store succesfully updated!").await?;

    Ok(Redirect::to(&store_path(store.id)).into_response())
}
