//! Domain services.
//!
//! Each service wraps the matching repository with input validation and
//! ownership resolution; route handlers stay thin. The sale workflow in
//! [`sales`] is the one non-CRUD piece, sequencing the stock decrement,
//! the sale insert, and the notification side effects.

pub mod email;
pub mod inventory;
pub mod sales;
pub mod stores;
pub mod suppliers;

pub use inventory::InventoryService;
pub use sales::SalesService;
pub use stores::StoreService;
pub use suppliers::SupplierService;

use quitanda_core::TaxId;

use crate::error::AppError;

/// Reject blank or whitespace-only required fields.
fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Reject negative values for counts that may legitimately be zero.
fn require_non_negative(field: &str, value: i64) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::Validation(format!("{field} cannot be negative")));
    }
    Ok(())
}

/// Reject zero and negative values.
fn require_positive(field: &str, value: i64) -> Result<(), AppError> {
    if value <= 0 {
        return Err(AppError::Validation(format!("{field} must be positive")));
    }
    Ok(())
}

/// Parse a tax id, surfacing failures as validation errors.
fn parse_tax_id(raw: &str) -> Result<TaxId, AppError> {
    TaxId::parse(raw).map_err(|e| AppError::Validation(e.to_string()))
}
