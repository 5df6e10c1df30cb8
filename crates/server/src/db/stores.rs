//! Store repository for database operations.
//!
//! Every read and write is scoped to the owning user. A store that exists
//! but belongs to someone else behaves exactly like a store that does not
//! exist, so callers cannot probe other tenants' ids.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use quitanda_core::{StoreId, TaxId, UserId};

use super::{parse_uuid, RepositoryError};
use crate::models::{Store, UpdateStoreInput};

/// Internal row type for store queries.
#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: String,
    user_id: String,
    name: String,
    cnpj: String,
    employees: i64,
    address: String,
    phone: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StoreRow> for Store {
    type Error = RepositoryError;

    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        let cnpj = TaxId::parse(&row.cnpj).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid cnpj in database: {e}"))
        })?;

        Ok(Self {
            id: parse_uuid(&row.id, "stores.id")?.into(),
            user_id: parse_uuid(&row.user_id, "stores.user_id")?.into(),
            name: row.name,
            cnpj,
            employees: row.employees,
            address: row.address,
            phone: row.phone,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const STORE_COLUMNS: &str = "id, user_id, name, cnpj, employees, address, phone, email, \
                             created_at, updated_at";

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the CNPJ is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, store: &Store) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO stores (id, user_id, name, cnpj, employees, address, phone, email,
                                created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(store.id.to_string())
        .bind(store.user_id.to_string())
        .bind(&store.name)
        .bind(store.cnpj.as_str())
        .bind(store.employees)
        .bind(&store.address)
        .bind(&store.phone)
        .bind(&store.email)
        .bind(store.created_at)
        .bind(store.updated_at)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("cnpj already registered".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// Get a store by ID, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(
        &self,
        id: StoreId,
        user_id: UserId,
    ) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE id = ? AND user_id = ?"
        ))
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(Store::try_from).transpose()
    }

    /// List all stores owned by a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Store>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE user_id = ? ORDER BY created_at ASC"
        ))
        .bind(user_id.to_string())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Store::try_from).collect()
    }

    /// Update a store, applying only the fields present in the input.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist or is
    /// owned by someone else.
    /// Returns `RepositoryError::Conflict` if a CNPJ change collides with
    /// another store.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: StoreId,
        user_id: UserId,
        input: &UpdateStoreInput,
    ) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            r"
            UPDATE stores
            SET name = COALESCE(?, name),
                cnpj = COALESCE(?, cnpj),
                employees = COALESCE(?, employees),
                address = COALESCE(?, address),
                phone = COALESCE(?, phone),
                email = COALESCE(?, email),
                updated_at = ?
            WHERE id = ? AND user_id = ?
            RETURNING {STORE_COLUMNS}
            "
        ))
        .bind(input.name.as_deref())
        .bind(input.cnpj.as_deref())
        .bind(input.employees)
        .bind(input.address.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.email.as_deref())
        .bind(Utc::now())
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("cnpj already registered".to_owned());
            }
            RepositoryError::Database(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a store and everything under it (inventory, sales, suppliers
    /// cascade).
    ///
    /// # Returns
    ///
    /// Returns `true` if the store was deleted, `false` if it didn't exist
    /// or is owned by someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: StoreId, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = ? AND user_id = ?")
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
    use quitanda_core::Email;

    use super::*;
    use crate::db::test_pool;
    use crate::db::users::UserRepository;
    use crate::models::User;

    async fn seed_user(pool: &SqlitePool, email: &str) -> User {
        UserRepository::new(pool)
            .find_or_create(&Email::parse(email).unwrap(), "Test Owner")
            .await
            .unwrap()
    }

    fn sample_store(user_id: UserId, cnpj: &str) -> Store {
        let now = Utc::now();
        Store {
            id: StoreId::new(),
            user_id,
            name: "Quitanda do Centro".to_owned(),
            cnpj: TaxId::parse(cnpj).unwrap(),
            employees: 3,
            address: "Rua das Laranjeiras, 10".to_owned(),
            phone: Some("+55 11 91234-5678".to_owned()),
            email: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let repo = StoreRepository::new(&pool);

        let store = sample_store(owner.id, "11.222.333/0001-44");
        repo.create(&store).await.unwrap();

        let found = repo.get(store.id, owner.id).await.unwrap().unwrap();
        assert_eq!(found.cnpj.as_str(), "11.222.333/0001-44");
        assert_eq!(found.employees, 3);
    }

    #[tokio::test]
    async fn test_get_scoped_to_owner() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let other = seed_user(&pool, "other@example.com").await;
        let repo = StoreRepository::new(&pool);

        let store = sample_store(owner.id, "11.222.333/0001-44");
        repo.create(&store).await.unwrap();

        assert!(repo.get(store.id, owner.id).await.unwrap().is_some());
        assert!(repo.get(store.id, other.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_cnpj_conflicts_across_users() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let other = seed_user(&pool, "other@example.com").await;
        let repo = StoreRepository::new(&pool);

        repo.create(&sample_store(owner.id, "11.222.333/0001-44"))
            .await
            .unwrap();
        let err = repo
            .create(&sample_store(other.id, "11.222.333/0001-44"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_for_user_isolated() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let other = seed_user(&pool, "other@example.com").await;
        let repo = StoreRepository::new(&pool);

        repo.create(&sample_store(owner.id, "11.222.333/0001-44"))
            .await
            .unwrap();
        repo.create(&sample_store(owner.id, "44.555.666/0001-77"))
            .await
            .unwrap();
        repo.create(&sample_store(other.id, "77.888.999/0001-00"))
            .await
            .unwrap();

        assert_eq!(repo.list_for_user(owner.id).await.unwrap().len(), 2);
        assert_eq!(repo.list_for_user(other.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_partial() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let repo = StoreRepository::new(&pool);

        let store = sample_store(owner.id, "11.222.333/0001-44");
        repo.create(&store).await.unwrap();

        let input = UpdateStoreInput {
            name: Some("Quitanda Nova".to_owned()),
            ..Default::default()
        };
        let updated = repo.update(store.id, owner.id, &input).await.unwrap();

        assert_eq!(updated.name, "Quitanda Nova");
        // Untouched fields survive.
        assert_eq!(updated.cnpj.as_str(), "11.222.333/0001-44");
        assert_eq!(updated.employees, 3);
    }

    #[tokio::test]
    async fn test_update_cnpj_collision_conflicts() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let repo = StoreRepository::new(&pool);

        repo.create(&sample_store(owner.id, "11.222.333/0001-44"))
            .await
            .unwrap();
        let second = sample_store(owner.id, "44.555.666/0001-77");
        repo.create(&second).await.unwrap();

        let input = UpdateStoreInput {
            cnpj: Some("11.222.333/0001-44".to_owned()),
            ..Default::default()
        };
        let err = repo.update(second.id, owner.id, &input).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_unowned_is_not_found() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let other = seed_user(&pool, "other@example.com").await;
        let repo = StoreRepository::new(&pool);

        let store = sample_store(owner.id, "11.222.333/0001-44");
        repo.create(&store).await.unwrap();

        let input = UpdateStoreInput {
            name: Some("Taken Over".to_owned()),
            ..Default::default()
        };
        let err = repo.update(store.id, other.id, &input).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let repo = StoreRepository::new(&pool);

        let store = sample_store(owner.id, "11.222.333/0001-44");
        repo.create(&store).await.unwrap();

        assert!(repo.delete(store.id, owner.id).await.unwrap());
        assert!(!repo.delete(store.id, owner.id).await.unwrap());
        assert!(repo.get(store.id, owner.id).await.unwrap().is_none());
    }
}
