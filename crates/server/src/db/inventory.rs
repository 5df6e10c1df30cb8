//! Inventory repository for database operations.
//!
//! The stock ledger is the contended surface of the system: sales decrement
//! it concurrently. The decrement is a single conditional UPDATE so that
//! checking sufficiency and taking the stock cannot interleave with another
//! writer.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use quitanda_core::{InventoryItemId, StoreId, UserId};

use super::{parse_uuid, RepositoryError};
use crate::models::{InventoryItem, UpdateItemInput};

/// Internal row type for inventory queries.
#[derive(Debug, sqlx::FromRow)]
struct InventoryItemRow {
    id: String,
    store_id: String,
    fruit: String,
    quantity: i64,
    unit: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InventoryItemRow> for InventoryItem {
    type Error = RepositoryError;

    fn try_from(row: InventoryItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id, "inventory_items.id")?.into(),
            store_id: parse_uuid(&row.store_id, "inventory_items.store_id")?.into(),
            fruit: row.fruit,
            quantity: row.quantity,
            unit: row.unit,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const ITEM_COLUMNS: &str = "id, store_id, fruit, quantity, unit, created_at, updated_at";

/// Repository for inventory database operations.
pub struct InventoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new inventory item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the store already stocks this
    /// fruit.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, item: &InventoryItem) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO inventory_items (id, store_id, fruit, quantity, unit,
                                         created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(item.id.to_string())
        .bind(item.store_id.to_string())
        .bind(&item.fruit)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "fruit already stocked at this store".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// Get an inventory item by ID, scoped to the store's owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(
        &self,
        id: InventoryItemId,
        user_id: UserId,
    ) -> Result<Option<InventoryItem>, RepositoryError> {
        let row = sqlx::query_as::<_, InventoryItemRow>(
            r"
            SELECT i.id, i.store_id, i.fruit, i.quantity, i.unit,
                   i.created_at, i.updated_at
            FROM inventory_items i
            JOIN stores s ON s.id = i.store_id
            WHERE i.id = ? AND s.user_id = ?
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(InventoryItem::try_from).transpose()
    }

    /// Get a store's stock of one fruit.
    ///
    /// Store ownership is the caller's concern; the sale workflow resolves
    /// the store before touching inventory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_fruit(
        &self,
        store_id: StoreId,
        fruit: &str,
    ) -> Result<Option<InventoryItem>, RepositoryError> {
        let row = sqlx::query_as::<_, InventoryItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE store_id = ? AND fruit = ?"
        ))
        .bind(store_id.to_string())
        .bind(fruit)
        .fetch_optional(self.pool)
        .await?;

        row.map(InventoryItem::try_from).transpose()
    }

    /// List a store's inventory, alphabetical by fruit.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_by_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, InventoryItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE store_id = ? ORDER BY fruit ASC"
        ))
        .bind(store_id.to_string())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(InventoryItem::try_from).collect()
    }

    /// Update an inventory item, applying only the fields present in the
    /// input.
    ///
    /// Quantity is written as given; there is no lower bound here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist or
    /// belongs to another user's store.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: InventoryItemId,
        user_id: UserId,
        input: &UpdateItemInput,
    ) -> Result<InventoryItem, RepositoryError> {
        let row = sqlx::query_as::<_, InventoryItemRow>(&format!(
            r"
            UPDATE inventory_items
            SET quantity = COALESCE(?, quantity),
                unit = COALESCE(?, unit),
                updated_at = ?
            WHERE id = ?
              AND store_id IN (SELECT id FROM stores WHERE user_id = ?)
            RETURNING {ITEM_COLUMNS}
            "
        ))
        .bind(input.quantity)
        .bind(input.unit.as_deref())
        .bind(Utc::now())
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete an inventory item.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was deleted, `false` if it didn't exist
    /// or belongs to another user's store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        id: InventoryItemId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM inventory_items
            WHERE id = ?
              AND store_id IN (SELECT id FROM stores WHERE user_id = ?)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Take stock for a sale: decrement the row only if enough is there.
    ///
    /// Sufficiency check and decrement are one statement, so two concurrent
    /// sales cannot both pass a read-then-write check and oversell.
    ///
    /// # Returns
    ///
    /// The post-decrement quantity, or `None` when no row matched. A `None`
    /// means the fruit is not stocked **or** has fewer than `quantity`
    /// units; [`Self::get_by_fruit`] distinguishes the two.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn decrement(
        &self,
        store_id: StoreId,
        fruit: &str,
        quantity: i64,
    ) -> Result<Option<i64>, RepositoryError> {
        let remaining = sqlx::query_scalar::<_, i64>(
            r"
            UPDATE inventory_items
            SET quantity = quantity - ?,
                updated_at = ?
            WHERE store_id = ? AND fruit = ? AND quantity >= ?
            RETURNING quantity
            ",
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(store_id.to_string())
        .bind(fruit)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?;

        Ok(remaining)
    }

    /// Credit stock back, e.g. when a sale is corrected downwards.
    ///
    /// # Returns
    ///
    /// The post-increment quantity, or `None` when the fruit is not stocked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn increment(
        &self,
        store_id: StoreId,
        fruit: &str,
        quantity: i64,
    ) -> Result<Option<i64>, RepositoryError> {
        let remaining = sqlx::query_scalar::<_, i64>(
            r"
            UPDATE inventory_items
            SET quantity = quantity + ?,
                updated_at = ?
            WHERE store_id = ? AND fruit = ?
            RETURNING quantity
            ",
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(store_id.to_string())
        .bind(fruit)
        .fetch_optional(self.pool)
        .await?;

        Ok(remaining)
    }
}
