//! Supplier repository for database operations.
//!
//! A supplier's fruit list is stored as a JSON array in a TEXT column;
//! nothing queries inside it, so a relational breakout isn't worth a join.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use quitanda_core::{StoreId, SupplierId, TaxId, UserId};

use super::{parse_uuid, RepositoryError};
use crate::models::{Supplier, UpdateSupplierInput};

/// Internal row type for supplier queries.
#[derive(Debug, sqlx::FromRow)]
struct SupplierRow {
    id: String,
    store_id: String,
    name: String,
    cnpj: String,
    address: String,
    fruits: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SupplierRow> for Supplier {
    type Error = RepositoryError;

    fn try_from(row: SupplierRow) -> Result<Self, Self::Error> {
        let cnpj = TaxId::parse(&row.cnpj).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid cnpj in database: {e}"))
        })?;
        let fruits: Vec<String> = serde_json::from_str(&row.fruits).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid fruits list in database: {e}"))
        })?;

        Ok(Self {
            id: parse_uuid(&row.id, "suppliers.id")?.into(),
            store_id: parse_uuid(&row.store_id, "suppliers.store_id")?.into(),
            name: row.name,
            cnpj,
            address: row.address,
            fruits,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn encode_fruits(fruits: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(fruits).map_err(|e| {
        RepositoryError::DataCorruption(format!("failed to serialize fruits list: {e}"))
    })
}

const SUPPLIER_COLUMNS: &str = "id, store_id, name, cnpj, address, fruits, \
                                created_at, updated_at";

/// Repository for supplier database operations.
pub struct SupplierRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SupplierRepository<'a> {
    /// Create a new supplier repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new supplier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the store already has a
    /// supplier with this CNPJ.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, supplier: &Supplier) -> Result<(), RepositoryError> {
        let fruits = encode_fruits(&supplier.fruits)?;

        sqlx::query(
            r"
            INSERT INTO suppliers (id, store_id, name, cnpj, address, fruits,
                                   created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(supplier.id.to_string())
        .bind(supplier.store_id.to_string())
        .bind(&supplier.name)
        .bind(supplier.cnpj.as_str())
        .bind(&supplier.address)
        .bind(fruits)
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "supplier cnpj already registered at this store".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// Get a supplier by ID, scoped to the store's owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(
        &self,
        id: SupplierId,
        user_id: UserId,
    ) -> Result<Option<Supplier>, RepositoryError> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r"
            SELECT su.id, su.store_id, su.name, su.cnpj, su.address, su.fruits,
                   su.created_at, su.updated_at
            FROM suppliers su
            JOIN stores s ON s.id = su.store_id
            WHERE su.id = ? AND s.user_id = ?
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(Supplier::try_from).transpose()
    }

    /// List a store's suppliers, alphabetical by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_by_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<Supplier>, RepositoryError> {
        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE store_id = ? ORDER BY name ASC"
        ))
        .bind(store_id.to_string())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Supplier::try_from).collect()
    }

    /// Update a supplier, applying only the fields present in the input.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the supplier doesn't exist or
    /// belongs to another user's store.
    /// Returns `RepositoryError::Conflict` if a CNPJ change collides with
    /// another supplier at the same store.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: SupplierId,
        user_id: UserId,
        input: &UpdateSupplierInput,
    ) -> Result<Supplier, RepositoryError> {
        let fruits = input.fruits.as_deref().map(encode_fruits).transpose()?;

        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            r"
            UPDATE suppliers
            SET name = COALESCE(?, name),
                cnpj = COALESCE(?, cnpj),
                address = COALESCE(?, address),
                fruits = COALESCE(?, fruits),
                updated_at = ?
            WHERE id = ?
              AND store_id IN (SELECT id FROM stores WHERE user_id = ?)
            RETURNING {SUPPLIER_COLUMNS}
            "
        ))
        .bind(input.name.as_deref())
        .bind(input.cnpj.as_deref())
        .bind(input.address.as_deref())
        .bind(fruits)
        .bind(Utc::now())
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "supplier cnpj already registered at this store".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a supplier.
    ///
    /// # Returns
    ///
    /// Returns `true` if the supplier was deleted, `false` if it didn't
    /// exist or belongs to another user's store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: SupplierId, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM suppliers
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
}
