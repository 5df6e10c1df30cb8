//! Inventory domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quitanda_core::{InventoryItemId, StoreId};

/// Stock of one fruit at one store.
///
/// A store carries at most one row per fruit; sales decrement `quantity`
/// in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Unique item ID.
    pub id: InventoryItemId,
    /// Store holding the stock.
    pub store_id: StoreId,
    /// Fruit name (e.g. "banana").
    pub fruit: String,
    /// Units currently in stock.
    pub quantity: i64,
    /// Unit of measure (e.g. "kg", "box").
    pub unit: String,
    /// When the item was first stocked.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for stocking a new fruit at a store.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemInput {
    /// Store to stock.
    pub store_id: StoreId,
    /// Fruit name; unique per store.
    pub fruit: String,
    /// Initial quantity.
    pub quantity: i64,
    /// Unit of measure.
    pub unit: String,
}

/// Input for updating an inventory item. Omitted fields are left unchanged.
///
/// Quantity is accepted as-is, including values below zero. Sales are the
/// only guarded path; direct edits are trusted. Unknown fields are
/// rejected rather than silently dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateItemInput {
    /// Units in stock.
    pub quantity: Option<i64>,
    /// Unit of measure.
    pub unit: Option<String>,
}
