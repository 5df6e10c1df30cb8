//! Supplier management scoped to a store.

use chrono::Utc;
use sqlx::SqlitePool;

use quitanda_core::{StoreId, SupplierId};

use super::{parse_tax_id, require_non_empty};
use crate::db::{StoreRepository, SupplierRepository};
use crate::error::AppError;
use crate::models::{CreateSupplierInput, Supplier, UpdateSupplierInput, User};

/// Supplier CRUD scoped to the calling user's stores.
pub struct SupplierService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SupplierService<'a> {
    /// Create a new supplier service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a supplier under one of the user's stores.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a field fails validation, `NotFound` if the
    /// store is absent or unowned, and `Conflict` if the store already has
    /// a supplier with this CNPJ.
    pub async fn create(
        &self,
        user: &User,
        input: CreateSupplierInput,
    ) -> Result<Supplier, AppError> {
        require_non_empty("name", &input.name)?;
        require_non_empty("address", &input.address)?;
        let cnpj = parse_tax_id(&input.cnpj)?;

        // Resolve the store first so an unowned store reads as absent
        // rather than leaking its supplier list through a Conflict.
        StoreRepository::new(self.pool)
            .get(input.store_id, user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;

        let now = Utc::now();
        let supplier = Supplier {
            id: SupplierId::new(),
            store_id: input.store_id,
            name: input.name,
            cnpj,
            address: input.address,
            fruits: input.fruits,
            created_at: now,
            updated_at: now,
        };
        SupplierRepository::new(self.pool).create(&supplier).await?;

        Ok(supplier)
    }

    /// List a store's suppliers, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the store is absent or unowned.
    pub async fn list_for_store(
        &self,
        user: &User,
        store_id: StoreId,
    ) -> Result<Vec<Supplier>, AppError> {
        StoreRepository::new(self.pool)
            .get(store_id, user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;

        Ok(SupplierRepository::new(self.pool)
            .list_by_store(store_id)
            .await?)
    }

    /// Fetch one supplier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the supplier is absent or its store is unowned.
    pub async fn get(&self, user: &User, id: SupplierId) -> Result<Supplier, AppError> {
        SupplierRepository::new(self.pool)
            .get(id, user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier not found".to_string()))
    }

    /// Update a supplier's details.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a supplied field fails validation, `NotFound`
    /// if the supplier is absent or its store is unowned, and `Conflict` if
    /// a CNPJ change collides within the store.
    pub async fn update(
        &self,
        user: &User,
        id: SupplierId,
        mut input: UpdateSupplierInput,
    ) -> Result<Supplier, AppError> {
        if let Some(name) = &input.name {
            require_non_empty("name", name)?;
        }
        if let Some(address) = &input.address {
            require_non_empty("address", address)?;
        }
        if let Some(cnpj) = &input.cnpj {
            input.cnpj = Some(parse_tax_id(cnpj)?.into_inner());
        }

        Ok(SupplierRepository::new(self.pool)
            .update(id, user.id, &input)
            .await?)
    }

    /// Delete a supplier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the supplier is absent or its store is unowned.
    pub async fn delete(&self, user: &User, id: SupplierId) -> Result<(), AppError> {
        let deleted = SupplierRepository::new(self.pool).delete(id, user.id).await?;
        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound("Supplier not found".to_string()))
        }
    }
}
