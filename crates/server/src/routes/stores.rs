//! Store CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use quitanda_core::StoreId;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{CreateStoreInput, Store, UpdateStoreInput};
use crate::services::StoreService;
use crate::state::AppState;

/// Register a new store for the current user.
///
/// # Route
///
/// `POST /stores`
///
/// # Errors
///
/// Returns 400 if a field fails validation and 409 if the CNPJ is
/// already registered.
pub async fn create(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<CreateStoreInput>,
) -> Result<(StatusCode, Json<Store>)> {
    let store = StoreService::new(state.pool()).create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

/// List the current user's stores.
///
/// # Route
///
/// `GET /stores`
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn index(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Store>>> {
    let stores = StoreService::new(state.pool()).list(&user).await?;
    Ok(Json(stores))
}

/// Fetch one store.
///
/// # Route
///
/// `GET /stores/{store_id}`
///
/// # Errors
///
/// Returns 404 if the store is absent or owned by someone else.
pub async fn show(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Store>> {
    let store = StoreService::new(state.pool()).get(&user, store_id).await?;
    Ok(Json(store))
}

/// Update a store. Omitted fields keep their values.
///
/// # Route
///
/// `PUT /stores/{store_id}`
///
/// # Errors
///
/// Returns 400 if a supplied field fails validation, 404 if the store is
/// absent or unowned, and 409 if a CNPJ change collides.
pub async fn update(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Json(input): Json<UpdateStoreInput>,
) -> Result<Json<Store>> {
    let store = StoreService::new(state.pool())
        .update(&user, store_id, input)
        .await?;
    Ok(Json(store))
}

/// Delete a store and everything registered under it.
///
/// # Route
///
/// `DELETE /stores/{store_id}`
///
/// # Errors
///
/// Returns 404 if the store is absent or unowned.
pub async fn remove(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<StatusCode> {
    StoreService::new(state.pool()).delete(&user, store_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
