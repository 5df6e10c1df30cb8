//! Sale domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quitanda_core::{SaleId, StoreId};

/// A recorded sale of one fruit at one store.
///
/// Recording a sale decrements the matching inventory row first; a sale
/// row therefore implies stock was available when it happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Unique sale ID.
    pub id: SaleId,
    /// Store the sale happened at.
    pub store_id: StoreId,
    /// Fruit sold.
    pub fruit: String,
    /// Units sold.
    pub quantity: i64,
    /// Price per unit, in cents.
    pub unit_value_cents: i64,
    /// When the sale was recorded.
    pub created_at: DateTime<Utc>,
    /// When the sale was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Total value of the sale, in cents.
    #[must_use]
    pub const fn total_cents(&self) -> i64 {
        self.quantity * self.unit_value_cents
    }
}

/// Input for recording a sale.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleInput {
    /// Store the sale happened at.
    pub store_id: StoreId,
    /// Fruit sold; must be stocked at the store.
    pub fruit: String,
    /// Units sold.
    pub quantity: i64,
    /// Price per unit, in cents.
    pub unit_value_cents: i64,
}

/// Input for correcting a sale. Omitted fields are left unchanged.
///
/// Store and fruit are fixed once recorded; only the numbers can move.
/// A quantity change reconciles the inventory ledger by the delta.
/// Unknown fields are rejected rather than silently dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateSaleInput {
    /// Units sold.
    pub quantity: Option<i64>,
    /// Price per unit, in cents.
    pub unit_value_cents: Option<i64>,
}
