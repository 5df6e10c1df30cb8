//! Inventory management.
//!
//! Stock movements driven by sales live in [`super::sales`]; this service
//! covers the direct CRUD surface. Direct quantity edits are trusted as
//! given, including values below zero; only the sale path guards stock.

use chrono::Utc;
use sqlx::SqlitePool;

use quitanda_core::{InventoryItemId, StoreId};

use super::{require_non_empty, require_non_negative};
use crate::db::{InventoryRepository, StoreRepository};
use crate::error::AppError;
use crate::models::{CreateItemInput, InventoryItem, UpdateItemInput, User};

/// Inventory CRUD scoped to the calling user.
pub struct InventoryService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> InventoryService<'a> {
    /// Create a new inventory service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Stock a fruit at a store.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a field fails validation, `NotFound` if the
    /// store is absent or unowned, `Conflict` if the fruit is already
    /// stocked there.
    pub async fn create(
        &self,
        user: &User,
        input: CreateItemInput,
    ) -> Result<InventoryItem, AppError> {
        require_non_empty("fruit", &input.fruit)?;
        require_non_empty("unit", &input.unit)?;
        require_non_negative("quantity", input.quantity)?;

        // Resolve the store first so an unowned store reads as absent
        // rather than leaking its inventory state through a Conflict.
        StoreRepository::new(self.pool)
            .get(input.store_id, user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;

        let now = Utc::now();
        let item = InventoryItem {
            id: InventoryItemId::new(),
            store_id: input.store_id,
            fruit: input.fruit,
            quantity: input.quantity,
            unit: input.unit,
            created_at: now,
            updated_at: now,
        };

        InventoryRepository::new(self.pool).create(&item).await?;
        Ok(item)
    }

    /// List a store's inventory, alphabetical by fruit.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the store is absent or unowned.
    pub async fn list_for_store(
        &self,
        user: &User,
        store_id: StoreId,
    ) -> Result<Vec<InventoryItem>, AppError> {
        StoreRepository::new(self.pool)
            .get(store_id, user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;

        Ok(InventoryRepository::new(self.pool)
            .list_by_store(store_id)
            .await?)
    }

    /// Fetch one inventory item.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the item is absent or its store is unowned.
    pub async fn get(&self, user: &User, id: InventoryItemId) -> Result<InventoryItem, AppError> {
        InventoryRepository::new(self.pool)
            .get(id, user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Inventory item not found".to_string()))
    }

    /// Apply a partial update to an inventory item.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the unit is blank, `NotFound` if the item is
    /// absent or its store is unowned.
    pub async fn update(
        &self,
        user: &User,
        id: InventoryItemId,
        input: UpdateItemInput,
    ) -> Result<InventoryItem, AppError> {
        if let Some(unit) = &input.unit {
            require_non_empty("unit", unit)?;
        }

        Ok(InventoryRepository::new(self.pool)
            .update(id, user.id, &input)
            .await?)
    }

    /// Delete an inventory item.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the item is absent or its store is unowned.
    pub async fn delete(&self, user: &User, id: InventoryItemId) -> Result<(), AppError> {
        let deleted = InventoryRepository::new(self.pool)
            .delete(id, user.id)
            .await?;
        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound("Inventory item not found".to_string()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quitanda_core::{Email, TaxId, UserId};

    use super::*;
    use crate::db::{UserRepository, test_pool};
    use crate::models::Store;

    async fn seed_user(pool: &SqlitePool, email: &str) -> User {
        UserRepository::new(pool)
            .find_or_create(&Email::parse(email).unwrap(), "Test Owner")
            .await
            .unwrap()
    }

    async fn seed_store(pool: &SqlitePool, user_id: UserId, cnpj: &str) -> Store {
        let now = Utc::now();
        let store = Store {
            id: StoreId::new(),
            user_id,
            name: "Quitanda do Centro".to_string(),
            cnpj: TaxId::parse(cnpj).unwrap(),
            employees: 2,
            address: "Rua das Laranjeiras, 10".to_string(),
            phone: None,
            email: None,
            created_at: now,
            updated_at: now,
        };
        StoreRepository::new(pool).create(&store).await.unwrap();
        store
    }

    fn sample_input(store_id: StoreId, fruit: &str) -> CreateItemInput {
        CreateItemInput {
            store_id,
            fruit: fruit.to_string(),
            quantity: 25,
            unit: "kg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "owner@example.com").await;
        let store = seed_store(&pool, user.id, "11.222.333/0001-44").await;
        let service = InventoryService::new(&pool);

        let item = service
            .create(&user, sample_input(store.id, "Banana"))
            .await
            .unwrap();

        let fetched = service.get(&user, item.id).await.unwrap();
        assert_eq!(fetched.fruit, "Banana");
        assert_eq!(fetched.quantity, 25);
    }

    #[tokio::test]
    async fn test_create_against_unowned_store_is_not_found() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let stranger = seed_user(&pool, "stranger@example.com").await;
        let store = seed_store(&pool, owner.id, "11.222.333/0001-44").await;
        let service = InventoryService::new(&pool);

        let err = service
            .create(&stranger, sample_input(store.id, "Banana"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_duplicate_fruit_conflicts() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "owner@example.com").await;
        let store = seed_store(&pool, user.id, "11.222.333/0001-44").await;
        let service = InventoryService::new(&pool);

        service
            .create(&user, sample_input(store.id, "Banana"))
            .await
            .unwrap();
        let err = service
            .create(&user, sample_input(store.id, "Banana"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_initial_quantity() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "owner@example.com").await;
        let store = seed_store(&pool, user.id, "11.222.333/0001-44").await;
        let service = InventoryService::new(&pool);

        let mut input = sample_input(store.id, "Banana");
        input.quantity = -1;

        let err = service.create(&user, input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_requires_store_ownership() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let stranger = seed_user(&pool, "stranger@example.com").await;
        let store = seed_store(&pool, owner.id, "11.222.333/0001-44").await;
        let service = InventoryService::new(&pool);

        service
            .create(&owner, sample_input(store.id, "Banana"))
            .await
            .unwrap();
        service
            .create(&owner, sample_input(store.id, "Apple"))
            .await
            .unwrap();

        let items = service.list_for_store(&owner, store.id).await.unwrap();
        assert_eq!(items.len(), 2);

        let err = service
            .list_for_store(&stranger, store.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_trusts_direct_quantity_edits() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "owner@example.com").await;
        let store = seed_store(&pool, user.id, "11.222.333/0001-44").await;
        let service = InventoryService::new(&pool);

        let item = service
            .create(&user, sample_input(store.id, "Banana"))
            .await
            .unwrap();

        // Direct edits take any integer, negative included.
        let updated = service
            .update(
                &user,
                item.id,
                UpdateItemInput {
                    quantity: Some(-3),
                    unit: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.quantity, -3);

        let err = service
            .update(
                &user,
                item.id,
                UpdateItemInput {
                    quantity: None,
                    unit: Some("  ".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_then_missing() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "owner@example.com").await;
        let store = seed_store(&pool, user.id, "11.222.333/0001-44").await;
        let service = InventoryService::new(&pool);

        let item = service
            .create(&user, sample_input(store.id, "Banana"))
            .await
            .unwrap();

        service.delete(&user, item.id).await.unwrap();
        let err = service.delete(&user, item.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
