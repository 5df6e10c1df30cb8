//! Supplier CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use quitanda_core::{StoreId, SupplierId};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{CreateSupplierInput, Supplier, UpdateSupplierInput};
use crate::services::SupplierService;
use crate::state::AppState;

/// Register a supplier under one of the current user's stores.
///
/// # Route
///
/// `POST /suppliers`
///
/// # Errors
///
/// Returns 400 if a field fails validation, 404 if the store is absent or
/// unowned, and 409 if the store already has a supplier with this CNPJ.
pub async fn create(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSupplierInput>,
) -> Result<(StatusCode, Json<Supplier>)> {
    let supplier = SupplierService::new(state.pool())
        .create(&user, input)
        .await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// List a store's suppliers, sorted by name.
///
/// # Route
///
/// `GET /suppliers/store/{store_id}`
///
/// # Errors
///
/// Returns 404 if the store is absent or unowned.
pub async fn index(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<Supplier>>> {
    let suppliers = SupplierService::new(state.pool())
        .list_for_store(&user, store_id)
        .await?;
    Ok(Json(suppliers))
}

/// Fetch one supplier.
///
/// # Route
///
/// `GET /suppliers/{supplier_id}`
///
/// # Errors
///
/// Returns 404 if the supplier is absent or its store is unowned.
pub async fn show(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(supplier_id): Path<SupplierId>,
) -> Result<Json<Supplier>> {
    let supplier = SupplierService::new(state.pool())
        .get(&user, supplier_id)
        .await?;
    Ok(Json(supplier))
}

/// Update a supplier. Omitted fields keep their values.
///
/// # Route
///
/// `PUT /suppliers/{supplier_id}`
///
/// # Errors
///
/// Returns 400 if a supplied field fails validation, 404 if the supplier
/// is absent or its store is unowned, and 409 if a CNPJ change collides
/// within the store.
pub async fn update(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(supplier_id): Path<SupplierId>,
    Json(input): Json<UpdateSupplierInput>,
) -> Result<Json<Supplier>> {
    let supplier = SupplierService::new(state.pool())
        .update(&user, supplier_id, input)
        .await?;
    Ok(Json(supplier))
}

/// Delete a supplier.
///
/// # Route
///
/// `DELETE /suppliers/{supplier_id}`
///
/// # Errors
///
/// Returns 404 if the supplier is absent or its store is unowned.
pub async fn remove(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(supplier_id): Path<SupplierId>,
) -> Result<StatusCode> {
    SupplierService::new(state.pool())
        .delete(&user, supplier_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
