use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::{authorize_self, Caller};
use crate::auth::repo_types::User;
use crate::errors::ApiError;
use crate::ingredients::{IngredientInput, IngredientRow};
use crate::pantry::repo;
use crate::pantry::repo_types::{Container, ContainerKind};
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/pantry/items", get(list_pantry))
        .route("/shopping-list/items", get(list_shopping_list))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/pantry/items", post(add_pantry))
        .route("/pantry/items/:id", put(update_pantry).delete(delete_pantry))
        .route("/shopping-list/items", post(add_shopping_list))
        .route(
            "/shopping-list/items/:id",
            put(update_shopping_list).delete(delete_shopping_list),
        )
}

// --- pantry ---

#[instrument(skip(state, user))]
pub async fn list_pantry(
    State(state): State<AppState>,
    Caller(user): Caller,
) -> Result<Json<Vec<IngredientRow>>, ApiError> {
    list_items(&state, &user, ContainerKind::Pantry).await
}

#[instrument(skip(state, user, payload))]
pub async fn add_pantry(
    State(state): State<AppState>,
    Caller(user): Caller,
    Json(payload): Json<IngredientInput>,
) -> Result<(StatusCode, Json<IngredientRow>), ApiError> {
    add_item(&state, &user, ContainerKind::Pantry, payload).await
}

#[instrument(skip(state, user, payload))]
pub async fn update_pantry(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
    Json(payload): Json<IngredientInput>,
) -> Result<Json<IngredientRow>, ApiError> {
    update_item(&state, &user, ContainerKind::Pantry, id, payload).await
}

#[instrument(skip(state, user))]
pub async fn delete_pantry(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    delete_item(&state, &user, ContainerKind::Pantry, id).await
}

// --- shopping list ---

#[instrument(skip(state, user))]
pub async fn list_shopping_list(
    State(state): State<AppState>,
    Caller(user): Caller,
) -> Result<Json<Vec<IngredientRow>>, ApiError> {
    list_items(&state, &user, ContainerKind::ShoppingList).await
}

#[instrument(skip(state, user, payload))]
pub async fn add_shopping_list(
    State(state): State<AppState>,
    Caller(user): Caller,
    Json(payload): Json<IngredientInput>,
) -> Result<(StatusCode, Json<IngredientRow>), ApiError> {
    add_item(&state, &user, ContainerKind::ShoppingList, payload).await
}

#[instrument(skip(state, user, payload))]
pub async fn update_shopping_list(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
    Json(payload): Json<IngredientInput>,
) -> Result<Json<IngredientRow>, ApiError> {
    update_item(&state, &user, ContainerKind::ShoppingList, id, payload).await
}

#[instrument(skip(state, user))]
pub async fn delete_shopping_list(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    delete_item(&state, &user, ContainerKind::ShoppingList, id).await
}

// --- shared across both containers ---

async fn list_items(
    state: &AppState,
    user: &User,
    kind: ContainerKind,
) -> Result<Json<Vec<IngredientRow>>, ApiError> {
    let items = match Container::find(&state.db, user.id, kind).await? {
        Some(container) => Container::items(&state.db, container.id).await?,
        None => Vec::new(),
    };
    Ok(Json(items))
}

async fn add_item(
    state: &AppState,
    user: &User,
    kind: ContainerKind,
    payload: IngredientInput,
) -> Result<(StatusCode, Json<IngredientRow>), ApiError> {
    let input = payload.validate().map_err(ApiError::Validation)?;
    let container = Container::find_or_create(&state.db, user.id, kind).await?;

    let existing = Container::items(&state.db, container.id)
        .await?
        .into_iter()
        .find(|row| row.matches(&input.name, input.form.as_deref()) && row.same_unit(&input.unit));

    match existing {
        Some(row) => {
            let merged = repo::merge_quantity(&state.db, row.id, input.quantity).await?;
            info!(user_id = %user.id, item_id = %merged.id, kind = kind.as_str(), "item quantity merged");
            Ok((StatusCode::OK, Json(merged)))
        }
        None => {
            let created = repo::insert_item(&state.db, container.id, &input).await?;
            info!(user_id = %user.id, item_id = %created.id, kind = kind.as_str(), "item added");
            Ok((StatusCode::CREATED, Json(created)))
        }
    }
}

async fn update_item(
    state: &AppState,
    user: &User,
    kind: ContainerKind,
    id: Uuid,
    payload: IngredientInput,
) -> Result<Json<IngredientRow>, ApiError> {
    let input = payload.validate().map_err(ApiError::Validation)?;
    let item = repo::find_item(&state.db, id)
        .await?
        .filter(|item| item.is_kind(kind))
        .ok_or(ApiError::NotFound(kind.item_name()))?;
    authorize_self(user, item.owner_id, None, None)?;

    let updated = repo::update_item(&state.db, id, &input).await?;
    info!(user_id = %user.id, item_id = %id, kind = kind.as_str(), "item updated");
    Ok(Json(updated))
}

async fn delete_item(
    state: &AppState,
    user: &User,
    kind: ContainerKind,
    id: Uuid,
) -> Result<StatusCode, ApiError> {
    let item = repo::find_item(&state.db, id)
        .await?
        .filter(|item| item.is_kind(kind))
        .ok_or(ApiError::NotFound(kind.item_name()))?;
    authorize_self(user, item.owner_id, None, None)?;

    repo::delete_item(&state.db, id).await?;
    info!(user_id = %user.id, item_id = %id, kind = kind.as_str(), "item deleted");
    Ok(StatusCode::NO_CONTENT)
}
