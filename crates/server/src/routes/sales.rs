//! Sale handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use quitanda_core::SaleId;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{CreateSaleInput, Sale, UpdateSaleInput};
use crate::services::SalesService;
use crate::state::AppState;

/// Record a sale against a store's inventory.
///
/// Stock is taken before the sale is persisted; the completion email and
/// any low stock warning go out after.
///
/// # Route
///
/// `POST /sales`
///
/// # Errors
///
/// Returns 400 if a field fails validation, 404 if the store is absent or
/// unowned or the fruit is not stocked there, and 422 if the on-hand
/// quantity cannot cover the sale.
pub async fn create(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSaleInput>,
) -> Result<(StatusCode, Json<Sale>)> {
    let sale = SalesService::new(state.pool(), state.notifier())
        .create(&user, input)
        .await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// List sales across the current user's stores, newest first.
///
/// # Route
///
/// `GET /sales`
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn index(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Sale>>> {
    let sales = SalesService::new(state.pool(), state.notifier())
        .list(&user)
        .await?;
    Ok(Json(sales))
}

/// Fetch one sale.
///
/// # Route
///
/// `GET /sales/{sale_id}`
///
/// # Errors
///
/// Returns 404 if the sale is absent or its store is unowned.
pub async fn show(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(sale_id): Path<SaleId>,
) -> Result<Json<Sale>> {
    let sale = SalesService::new(state.pool(), state.notifier())
        .get(&user, sale_id)
        .await?;
    Ok(Json(sale))
}

/// Correct a sale's quantity or unit value.
///
/// A quantity change moves the difference through the store's inventory
/// under the same stock guard as a new sale.
///
/// # Route
///
/// `PUT /sales/{sale_id}`
///
/// # Errors
///
/// Returns 400 if a supplied field fails validation, 404 if the sale is
/// absent or its store is unowned, and 422 if a quantity increase cannot
/// be covered by the on-hand inventory.
pub async fn update(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(sale_id): Path<SaleId>,
    Json(input): Json<UpdateSaleInput>,
) -> Result<Json<Sale>> {
    let sale = SalesService::new(state.pool(), state.notifier())
        .update(&user, sale_id, input)
        .await?;
    Ok(Json(sale))
}

/// Delete a sale record. The inventory it consumed stays consumed.
///
/// # Route
///
/// `DELETE /sales/{sale_id}`
///
/// # Errors
///
/// Returns 404 if the sale is absent or its store is unowned.
pub async fn remove(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(sale_id): Path<SaleId>,
) -> Result<StatusCode> {
    SalesService::new(state.pool(), state.notifier())
        .delete(&user, sale_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
