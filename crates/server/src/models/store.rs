//! Store domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quitanda_core::{StoreId, TaxId, UserId};

/// A fruit store owned by a single user.
///
/// All inventory, sales, and suppliers hang off a store, and every access
/// is scoped to the owning user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Owning user.
    pub user_id: UserId,
    /// Store name.
    pub name: String,
    /// CNPJ, unique across all stores.
    pub cnpj: TaxId,
    /// Number of employees.
    pub employees: i64,
    /// Street address.
    pub address: String,
    /// Optional contact phone.
    pub phone: Option<String>,
    /// Optional contact email.
    pub email: Option<String>,
    /// When the store was registered.
    pub created_at: DateTime<Utc>,
    /// When the store was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a new store.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStoreInput {
    /// Store name.
    pub name: String,
    /// CNPJ; the exact string is the uniqueness key.
    pub cnpj: String,
    /// Number of employees (defaults to 0).
    #[serde(default)]
    pub employees: i64,
    /// Street address.
    pub address: String,
    /// Optional contact phone.
    pub phone: Option<String>,
    /// Optional contact email.
    pub email: Option<String>,
}

/// Input for updating a store. Omitted fields are left unchanged;
/// unknown fields are rejected rather than silently dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStoreInput {
    /// Store name.
    pub name: Option<String>,
    /// CNPJ; changing it re-checks global uniqueness.
    pub cnpj: Option<String>,
    /// Number of employees.
    pub employees: Option<i64>,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}
