//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use quitanda_core::{Email, UserId};

use super::{parse_uuid, RepositoryError};
use crate::models::User;

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: parse_uuid(&row.id, "users.id")?.into(),
            email,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, name, created_at, updated_at
            FROM users
            WHERE email = ?
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, name, created_at, updated_at
            FROM users
            WHERE id = ?
            ",
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO users (id, email, name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(user.id.to_string())
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// Get the user with this email, creating them if absent.
    ///
    /// Called from the OAuth callback, so a lost race against a concurrent
    /// first login falls back to reading the winner's row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn find_or_create(
        &self,
        email: &Email,
        name: &str,
    ) -> Result<User, RepositoryError> {
        if let Some(user) = self.get_by_email(email).await? {
            return Ok(user);
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: email.clone(),
            name: name.to_owned(),
            created_at: now,
            updated_at: now,
        };

        match self.create(&user).await {
            Ok(()) => Ok(user),
            Err(RepositoryError::Conflict(_)) => self
                .get_by_email(email)
                .await?
                .ok_or(RepositoryError::NotFound),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn sample_user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            email: Email::parse(email).unwrap(),
            name: "Maria Souza".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_by_email() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let user = sample_user("maria@example.com");
        repo.create(&user).await.unwrap();

        let found = repo
            .get_by_email(&Email::parse("maria@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.name, "Maria Souza");
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let user = sample_user("joao@example.com");
        repo.create(&user).await.unwrap();

        let found = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.email.as_str(), "joao@example.com");

        let missing = repo.get_by_id(UserId::new()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        repo.create(&sample_user("dup@example.com")).await.unwrap();
        let err = repo
            .create(&sample_user("dup@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);
        let email = Email::parse("ana@example.com").unwrap();

        let first = repo.find_or_create(&email, "Ana").await.unwrap();
        let second = repo.find_or_create(&email, "Ana Again").await.unwrap();

        // Second login reuses the row; the name is not overwritten.
        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Ana");
    }
}
