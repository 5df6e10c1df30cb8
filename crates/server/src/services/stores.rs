//! Store management.

use chrono::Utc;
use sqlx::SqlitePool;

use quitanda_core::StoreId;

use super::{parse_tax_id, require_non_empty, require_non_negative};
use crate::db::StoreRepository;
use crate::error::AppError;
use crate::models::{CreateStoreInput, Store, UpdateStoreInput, User};

/// Store CRUD scoped to the calling user.
pub struct StoreService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StoreService<'a> {
    /// Create a new store service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new store owned by the user.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a field fails validation, `Conflict` if the
    /// CNPJ is already registered to any store.
    pub async fn create(&self, user: &User, input: CreateStoreInput) -> Result<Store, AppError> {
        require_non_empty("name", &input.name)?;
        require_non_empty("address", &input.address)?;
        require_non_negative("employees", input.employees)?;
        let cnpj = parse_tax_id(&input.cnpj)?;

        let now = Utc::now();
        let store = Store {
            id: StoreId::new(),
            user_id: user.id,
            name: input.name,
            cnpj,
            employees: input.employees,
            address: input.address,
            phone: input.phone,
            email: input.email,
            created_at: now,
            updated_at: now,
        };

        StoreRepository::new(self.pool).create(&store).await?;
        Ok(store)
    }

    /// List the user's stores, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the query fails.
    pub async fn list(&self, user: &User) -> Result<Vec<Store>, AppError> {
        Ok(StoreRepository::new(self.pool)
            .list_for_user(user.id)
            .await?)
    }

    /// Fetch one store.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the store does not exist or belongs to someone
    /// else.
    pub async fn get(&self, user: &User, id: StoreId) -> Result<Store, AppError> {
        StoreRepository::new(self.pool)
            .get(id, user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))
    }

    /// Apply a partial update to a store.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a supplied field fails validation, `NotFound`
    /// if the store is absent or unowned, `Conflict` on a CNPJ collision.
    pub async fn update(
        &self,
        user: &User,
        id: StoreId,
        mut input: UpdateStoreInput,
    ) -> Result<Store, AppError> {
        if let Some(name) = &input.name {
            require_non_empty("name", name)?;
        }
        if let Some(address) = &input.address {
            require_non_empty("address", address)?;
        }
        if let Some(employees) = input.employees {
            require_non_negative("employees", employees)?;
        }
        if let Some(cnpj) = &input.cnpj {
            // Store the normalized form, not the raw input.
            input.cnpj = Some(parse_tax_id(cnpj)?.into_inner());
        }

        Ok(StoreRepository::new(self.pool)
            .update(id, user.id, &input)
            .await?)
    }

    /// Delete a store and everything under it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the store is absent or unowned.
    pub async fn delete(&self, user: &User, id: StoreId) -> Result<(), AppError> {
        let deleted = StoreRepository::new(self.pool).delete(id, user.id).await?;
        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound("Store not found".to_string()))
        }
    }
}
