//! Supplier domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quitanda_core::{StoreId, SupplierId, TaxId};

/// A supplier registered to one store.
///
/// Suppliers are store-local: two stores may each register the same CNPJ,
/// but one store cannot register it twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique supplier ID.
    pub id: SupplierId,
    /// Store the supplier belongs to.
    pub store_id: StoreId,
    /// Supplier name.
    pub name: String,
    /// CNPJ, unique within the store.
    pub cnpj: TaxId,
    /// Street address.
    pub address: String,
    /// Fruits this supplier provides.
    pub fruits: Vec<String>,
    /// When the supplier was registered.
    pub created_at: DateTime<Utc>,
    /// When the supplier was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a supplier.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSupplierInput {
    /// Store to register the supplier under.
    pub store_id: StoreId,
    /// Supplier name.
    pub name: String,
    /// CNPJ; the exact string is the uniqueness key within the store.
    pub cnpj: String,
    /// Street address.
    pub address: String,
    /// Fruits this supplier provides.
    #[serde(default)]
    pub fruits: Vec<String>,
}

/// Input for updating a supplier. Omitted fields are left unchanged;
/// unknown fields are rejected rather than silently dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateSupplierInput {
    /// Supplier name.
    pub name: Option<String>,
    /// CNPJ; changing it re-checks per-store uniqueness.
    pub cnpj: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Fruits this supplier provides.
    pub fruits: Option<Vec<String>>,
}
