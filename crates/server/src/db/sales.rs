//! Sale repository for database operations.
//!
//! Inserting a sale row is deliberately separate from decrementing the
//! inventory it consumed; the service layer sequences the two. See
//! `services::sales` for the ordering guarantees.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use quitanda_core::{SaleId, UserId};

use super::{parse_uuid, RepositoryError};
use crate::models::{Sale, UpdateSaleInput};

/// Internal row type for sale queries.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    store_id: String,
    fruit: String,
    quantity: i64,
    unit_value_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SaleRow> for Sale {
    type Error = RepositoryError;

    fn try_from(row: SaleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id, "sales.id")?.into(),
            store_id: parse_uuid(&row.store_id, "sales.store_id")?.into(),
            fruit: row.fruit,
            quantity: row.quantity,
            unit_value_cents: row.unit_value_cents,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for sale database operations.
pub struct SaleRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, sale: &Sale) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO sales (id, store_id, fruit, quantity, unit_value_cents,
                               created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(sale.id.to_string())
        .bind(sale.store_id.to_string())
        .bind(&sale.fruit)
        .bind(sale.quantity)
        .bind(sale.unit_value_cents)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get a sale by ID, scoped to the store's owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(&self, id: SaleId, user_id: UserId) -> Result<Option<Sale>, RepositoryError> {
        let row = sqlx::query_as::<_, SaleRow>(
            r"
            SELECT sa.id, sa.store_id, sa.fruit, sa.quantity, sa.unit_value_cents,
                   sa.created_at, sa.updated_at
            FROM sales sa
            JOIN stores s ON s.id = sa.store_id
            WHERE sa.id = ? AND s.user_id = ?
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(Sale::try_from).transpose()
    }

    /// List all sales across a user's stores, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Sale>, RepositoryError> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r"
            SELECT sa.id, sa.store_id, sa.fruit, sa.quantity, sa.unit_value_cents,
                   sa.created_at, sa.updated_at
            FROM sales sa
            JOIN stores s ON s.id = sa.store_id
            WHERE s.user_id = ?
            ORDER BY sa.created_at DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Sale::try_from).collect()
    }

    /// Update a sale's numbers, applying only the fields present in the
    /// input. Store and fruit never change here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the sale doesn't exist or
    /// belongs to another user's store.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: SaleId,
        user_id: UserId,
        input: &UpdateSaleInput,
    ) -> Result<Sale, RepositoryError> {
        let row = sqlx::query_as::<_, SaleRow>(
            r"
            UPDATE sales
            SET quantity = COALESCE(?, quantity),
                unit_value_cents = COALESCE(?, unit_value_cents),
                updated_at = ?
            WHERE id = ?
              AND store_id IN (SELECT id FROM stores WHERE user_id = ?)
            RETURNING id, store_id, fruit, quantity, unit_value_cents,
                      created_at, updated_at
            ",
        )
        .bind(input.quantity)
        .bind(input.unit_value_cents)
        .bind(Utc::now())
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a sale. The inventory it consumed stays consumed.
    ///
    /// # Returns
    ///
    /// Returns `true` if the sale was deleted, `false` if it didn't exist
    /// or belongs to another user's store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: SaleId, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM sales
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quitanda_core::{Email, StoreId, TaxId};

    use super::*;
    use crate::db::test_pool;
    use crate::db::stores::StoreRepository;
    use crate::db::users::UserRepository;
    use crate::models::{Store, User};

    async fn seed_owner_and_store(pool: &SqlitePool, email: &str, cnpj: &str) -> (User, Store) {
        let owner = UserRepository::new(pool)
            .find_or_create(&Email::parse(email).unwrap(), "Owner")
            .await
            .unwrap();
        let now = Utc::now();
        let store = Store {
            id: StoreId::new(),
            user_id: owner.id,
            name: "Quitanda".to_owned(),
            cnpj: TaxId::parse(cnpj).unwrap(),
            employees: 0,
            address: "Rua A, 1".to_owned(),
            phone: None,
            email: None,
            created_at: now,
            updated_at: now,
        };
        StoreRepository::new(pool).create(&store).await.unwrap();
        (owner, store)
    }

    fn sale(store_id: StoreId, fruit: &str, quantity: i64) -> Sale {
        let now = Utc::now();
        Sale {
            id: SaleId::new(),
            store_id,
            fruit: fruit.to_owned(),
            quantity,
            unit_value_cents: 350,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let (owner, store) = seed_owner_and_store(&pool, "o@example.com", "11.222.333/0001-44").await;
        let repo = SaleRepository::new(&pool);

        let s = sale(store.id, "banana", 10);
        repo.create(&s).await.unwrap();

        let found = repo.get(s.id, owner.id).await.unwrap().unwrap();
        assert_eq!(found.fruit, "banana");
        assert_eq!(found.total_cents(), 3500);
    }

    #[tokio::test]
    async fn test_get_scoped_to_owner() {
        let pool = test_pool().await;
        let (_, store) = seed_owner_and_store(&pool, "o@example.com", "11.222.333/0001-44").await;
        let (other, _) = seed_owner_and_store(&pool, "x@example.com", "44.555.666/0001-77").await;
        let repo = SaleRepository::new(&pool);

        let s = sale(store.id, "banana", 10);
        repo.create(&s).await.unwrap();

        assert!(repo.get(s.id, other.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_for_user_spans_stores() {
        let pool = test_pool().await;
        let (owner, first) = seed_owner_and_store(&pool, "o@example.com", "11.222.333/0001-44").await;
        let now = Utc::now();
        let second = Store {
            id: StoreId::new(),
            user_id: owner.id,
            name: "Filial".to_owned(),
            cnpj: TaxId::parse("44.555.666/0001-77").unwrap(),
            employees: 0,
            address: "Rua B, 2".to_owned(),
            phone: None,
            email: None,
            created_at: now,
            updated_at: now,
        };
        StoreRepository::new(&pool).create(&second).await.unwrap();
        let repo = SaleRepository::new(&pool);

        repo.create(&sale(first.id, "banana", 10)).await.unwrap();
        repo.create(&sale(second.id, "manga", 4)).await.unwrap();

        let sales = repo.list_for_user(owner.id).await.unwrap();
        assert_eq!(sales.len(), 2);
    }

    #[tokio::test]
    async fn test_update_partial() {
        let pool = test_pool().await;
        let (owner, store) = seed_owner_and_store(&pool, "o@example.com", "11.222.333/0001-44").await;
        let repo = SaleRepository::new(&pool);

        let s = sale(store.id, "banana", 10);
        repo.create(&s).await.unwrap();

        let input = UpdateSaleInput {
            unit_value_cents: Some(420),
            ..Default::default()
        };
        let updated = repo.update(s.id, owner.id, &input).await.unwrap();
        assert_eq!(updated.unit_value_cents, 420);
        assert_eq!(updated.quantity, 10);
        assert_eq!(updated.fruit, "banana");
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let (owner, store) = seed_owner_and_store(&pool, "o@example.com", "11.222.333/0001-44").await;
        let repo = SaleRepository::new(&pool);

        let s = sale(store.id, "banana", 10);
        repo.create(&s).await.unwrap();

        assert!(repo.delete(s.id, owner.id).await.unwrap());
        assert!(!repo.delete(s.id, owner.id).await.unwrap());
    }
}
