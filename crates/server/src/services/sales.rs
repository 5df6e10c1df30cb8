//! The sale workflow and sale CRUD.
//!
//! Recording a sale runs a fixed sequence: resolve the store under the
//! caller's ownership, take stock through a conditional decrement, persist
//! the sale row, then fire notifications. The decrement is durable before
//! the sale row exists, so a crash in between loses the sale record but
//! never oversells; notifications are best-effort and can only add log
//! lines, never failures.

use chrono::Utc;
use sqlx::SqlitePool;

use quitanda_core::SaleId;

use super::email::SaleNotifier;
use super::{require_non_empty, require_non_negative, require_positive};
use crate::db::{InventoryRepository, SaleRepository, StoreRepository};
use crate::error::AppError;
use crate::models::{CreateSaleInput, Sale, Store, UpdateSaleInput, User};

/// Inventory level below which a restock warning goes out after a sale.
pub const LOW_STOCK_THRESHOLD: i64 = 20;

/// Sale recording and CRUD scoped to the calling user.
pub struct SalesService<'a> {
    pool: &'a SqlitePool,
    notifier: &'a dyn SaleNotifier,
}

impl<'a> SalesService<'a> {
    /// Create a new sales service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, notifier: &'a dyn SaleNotifier) -> Self {
        Self { pool, notifier }
    }

    /// Record a sale against a store's inventory.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a field fails validation, `NotFound` if the
    /// store is absent or unowned or the fruit is not stocked there, and
    /// `InsufficientStock` if the on-hand quantity cannot cover the sale.
    pub async fn create(&self, user: &User, input: CreateSaleInput) -> Result<Sale, AppError> {
        require_non_empty("fruit", &input.fruit)?;
        require_positive("quantity", input.quantity)?;
        require_non_negative("unit_value_cents", input.unit_value_cents)?;

        let store = StoreRepository::new(self.pool)
            .get(input.store_id, user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;

        // One conditional UPDATE covers both the stock check and the
        // decrement, so concurrent sales cannot both pass a read-side
        // check and overdraw the row.
        let inventory = InventoryRepository::new(self.pool);
        let Some(remaining) = inventory
            .decrement(store.id, &input.fruit, input.quantity)
            .await?
        else {
            // The guard misses for an absent row and for a short row
            // alike; re-read to tell the two apart.
            let item = inventory
                .get_by_fruit(store.id, &input.fruit)
                .await?
                .ok_or_else(|| AppError::NotFound("Fruit not stocked at this store".to_string()))?;
            return Err(AppError::InsufficientStock {
                fruit: input.fruit,
                requested: input.quantity,
                available: item.quantity,
            });
        };

        // The decrement above is already durable. A crash before this
        // insert loses the sale row but not the stock movement.
        let now = Utc::now();
        let sale = Sale {
            id: SaleId::new(),
            store_id: store.id,
            fruit: input.fruit,
            quantity: input.quantity,
            unit_value_cents: input.unit_value_cents,
            created_at: now,
            updated_at: now,
        };
        SaleRepository::new(self.pool).create(&sale).await?;

        self.notify(user, &store, &sale, remaining).await;

        Ok(sale)
    }

    /// List all sales across the user's stores, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the query fails.
    pub async fn list(&self, user: &User) -> Result<Vec<Sale>, AppError> {
        Ok(SaleRepository::new(self.pool).list_for_user(user.id).await?)
    }

    /// Fetch one sale.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the sale is absent or its store is unowned.
    pub async fn get(&self, user: &User, id: SaleId) -> Result<Sale, AppError> {
        SaleRepository::new(self.pool)
            .get(id, user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sale not found".to_string()))
    }

    /// Correct a recorded sale's quantity or unit value.
    ///
    /// A quantity change reconciles the inventory ledger: extra units leave
    /// stock under the same guard as a new sale, returned units go back on
    /// the shelf. The sale's store and fruit are fixed at recording time.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a supplied field fails validation, `NotFound`
    /// if the sale is absent or its store is unowned, `InsufficientStock` if
    /// a quantity increase cannot be covered by the on-hand inventory.
    pub async fn update(
        &self,
        user: &User,
        id: SaleId,
        input: UpdateSaleInput,
    ) -> Result<Sale, AppError> {
        if let Some(quantity) = input.quantity {
            require_positive("quantity", quantity)?;
        }
        if let Some(unit_value_cents) = input.unit_value_cents {
            require_non_negative("unit_value_cents", unit_value_cents)?;
        }

        let sales = SaleRepository::new(self.pool);
        let current = sales
            .get(id, user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sale not found".to_string()))?;

        if let Some(new_quantity) = input.quantity {
            self.reconcile_quantity(&current, new_quantity).await?;
        }

        Ok(sales.update(id, user.id, &input).await?)
    }

    /// Delete a sale. The inventory it consumed stays consumed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the sale is absent or its store is unowned.
    pub async fn delete(&self, user: &User, id: SaleId) -> Result<(), AppError> {
        let deleted = SaleRepository::new(self.pool).delete(id, user.id).await?;
        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound("Sale not found".to_string()))
        }
    }

    /// Move inventory to match a corrected sale quantity.
    async fn reconcile_quantity(&self, current: &Sale, new_quantity: i64) -> Result<(), AppError> {
        let inventory = InventoryRepository::new(self.pool);
        let delta = new_quantity - current.quantity;

        if delta > 0 {
            if inventory
                .decrement(current.store_id, &current.fruit, delta)
                .await?
                .is_none()
            {
                let available = inventory
                    .get_by_fruit(current.store_id, &current.fruit)
                    .await?
                    .map_or(0, |item| item.quantity);
                return Err(AppError::InsufficientStock {
                    fruit: current.fruit.clone(),
                    requested: delta,
                    available,
                });
            }
        } else if delta < 0
            && inventory
                .increment(current.store_id, &current.fruit, -delta)
                .await?
                .is_none()
        {
            // The fruit was unstocked after the sale; the returned units
            // have nowhere to go.
            tracing::warn!(
                sale_id = %current.id,
                fruit = %current.fruit,
                "No inventory row to credit when shrinking sale"
            );
        }

        Ok(())
    }

    /// Fire the post-sale notifications, logging failures instead of
    /// surfacing them.
    async fn notify(&self, user: &User, store: &Store, sale: &Sale, remaining: i64) {
        if let Err(e) = self.notifier.sale_completed(&user.email, store, sale).await {
            tracing::warn!(error = %e, sale_id = %sale.id, "Failed to send sale notification");
        }

        if remaining < LOW_STOCK_THRESHOLD {
            if let Err(e) = self
                .notifier
                .low_stock(&user.email, store, &sale.fruit, remaining)
                .await
            {
                tracing::warn!(error = %e, store_id = %store.id, "Failed to send low stock warning");
            }
        }
    }
}
