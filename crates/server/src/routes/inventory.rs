//! Inventory CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use quitanda_core::{InventoryItemId, StoreId};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{CreateItemInput, InventoryItem, UpdateItemInput};
use crate::services::InventoryService;
use crate::state::AppState;

/// Stock a fruit in one of the current user's stores.
///
/// # Route
///
/// `POST /inventory`
///
/// # Errors
///
/// Returns 400 if a field fails validation, 404 if the store is absent or
/// unowned, and 409 if the fruit is already stocked there.
pub async fn create(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<CreateItemInput>,
) -> Result<(StatusCode, Json<InventoryItem>)> {
    let item = InventoryService::new(state.pool())
        .create(&user, input)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// List a store's inventory.
///
/// # Route
///
/// `GET /inventory/store/{store_id}`
///
/// # Errors
///
/// Returns 404 if the store is absent or unowned.
pub async fn index(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<InventoryItem>>> {
    let items = InventoryService::new(state.pool())
        .list_for_store(&user, store_id)
        .await?;
    Ok(Json(items))
}

/// Fetch one inventory item.
///
/// # Route
///
/// `GET /inventory/{item_id}`
///
/// # Errors
///
/// Returns 404 if the item is absent or its store is unowned.
pub async fn show(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(item_id): Path<InventoryItemId>,
) -> Result<Json<InventoryItem>> {
    let item = InventoryService::new(state.pool()).get(&user, item_id).await?;
    Ok(Json(item))
}

/// Update an inventory item. Omitted fields keep their values.
///
/// # Route
///
/// `PUT /inventory/{item_id}`
///
/// # Errors
///
/// Returns 400 if a supplied field fails validation and 404 if the item
/// is absent or its store is unowned.
pub async fn update(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(item_id): Path<InventoryItemId>,
    Json(input): Json<UpdateItemInput>,
) -> Result<Json<InventoryItem>> {
    let item = InventoryService::new(state.pool())
        .update(&user, item_id, input)
        .await?;
    Ok(Json(item))
}

/// Remove a fruit from a store's shelf.
///
/// # Route
///
/// `DELETE /inventory/{item_id}`
///
/// # Errors
///
/// Returns 404 if the item is absent or its store is unowned.
pub async fn remove(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(item_id): Path<InventoryItemId>,
) -> Result<StatusCode> {
    InventoryService::new(state.pool())
        .delete(&user, item_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
