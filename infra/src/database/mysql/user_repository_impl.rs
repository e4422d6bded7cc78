//! MySQL implementation of the UserRepository trait.
//!
//! Passwords are stored as bcrypt hashes; hashing and verification run on
//! the blocking thread pool.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use wa_core::domain::entities::user::User;
use wa_core::errors::DomainError;
use wa_core::repositories::UserRepository;

/// MySQL implementation of UserRepository
///
/// Operations are not bounded here; wrap the repository in
/// [`wa_core::repositories::TimedUserRepository`] to enforce a deadline.
#[derive(Clone)]
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
    /// bcrypt work factor for new password hashes
    hash_cost: u32,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Use a different bcrypt cost for new accounts
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Store a new account with a bcrypt-hashed password
    pub async fn create(&self, user: &User, password: &str) -> Result<(), DomainError> {
        let password = password.to_owned();
        let cost = self.hash_cost;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing task failed: {}", e),
            })?
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing failed: {}", e),
            })?;

        let query = r#"
            INSERT INTO users (id, username, email, password_hash, is_active)
            VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(&user.email)
            .bind(password_hash)
            .bind(user.is_active)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to create user: {}", e)))?;

        Ok(())
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::persistence(format!("Failed to get id: {}", e)))?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::persistence(format!("Invalid UUID: {}", e)))?,
            username: row
                .try_get("username")
                .map_err(|e| DomainError::persistence(format!("Failed to get username: {}", e)))?,
            email: row
                .try_get("email")
                .map_err(|e| DomainError::persistence(format!("Failed to get email: {}", e)))?,
            is_active: row
                .try_get("is_active")
                .map_err(|e| DomainError::persistence(format!("Failed to get is_active: {}", e)))?,
        })
    }

    async fn find_one(
        &self,
        column: &'static str,
        value: String,
    ) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT id, username, email, is_active FROM users WHERE {} = ?",
            column
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to find user: {}", e)))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", email.to_string()).await
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT password_hash FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::persistence(format!("Failed to load credentials: {}", e)))?;

        let Some(row) = row else {
            return Ok(false);
        };
        let password_hash: String = row
            .try_get("password_hash")
            .map_err(|e| DomainError::persistence(format!("Failed to get password_hash: {}", e)))?;

        let password = password.to_owned();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password verification task failed: {}", e),
            })?;

        match verified {
            Ok(matches) => Ok(matches),
            Err(e) => {
                // A malformed stored hash can never match
                tracing::warn!(error = %e, "Stored password hash could not be verified");
                Ok(false)
            }
        }
    }
}
