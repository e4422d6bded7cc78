//! MySQL implementation of the TokenRepository trait.
//!
//! Token records live in the `tokens` table. Records are never deleted;
//! every deactivation is a conditional update on `is_active = TRUE`, so
//! concurrent refreshes, revocations and sweeps of the same record are safe.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use wa_core::domain::entities::token::{NewTokenRecord, SessionRank, TokenRecord};
use wa_core::errors::DomainError;
use wa_core::repositories::TokenRepository;

const SELECT_COLUMNS: &str = "SELECT id, user_id, token, expires_at, is_active FROM tokens";

/// MySQL implementation of TokenRepository
///
/// Operations are not bounded here; wrap the repository in
/// [`wa_core::repositories::TimedTokenRepository`] to enforce a deadline.
#[derive(Clone)]
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to TokenRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<TokenRecord, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_error("id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| column_error("user_id", e))?;

        Ok(TokenRecord {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::persistence(format!("Invalid token UUID: {}", e)))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| DomainError::persistence(format!("Invalid user UUID: {}", e)))?,
            token: row.try_get("token").map_err(|e| column_error("token", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| column_error("expires_at", e))?,
            is_active: row
                .try_get("is_active")
                .map_err(|e| column_error("is_active", e))?,
        })
    }
}

fn column_error(column: &str, e: sqlx::Error) -> DomainError {
    DomainError::persistence(format!("Failed to get {}: {}", column, e))
}

fn query_error(operation: &str, e: sqlx::Error) -> DomainError {
    tracing::error!(operation, error = %e, "Token store query failed");
    DomainError::persistence(format!("Failed to {}: {}", operation, e))
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn insert(&self, record: NewTokenRecord) -> Result<Uuid, DomainError> {
        let id = Uuid::now_v7();

        let query = r#"
            INSERT INTO tokens (id, user_id, token, expires_at, is_active)
            VALUES (?, ?, ?, ?, TRUE)
        "#;

        sqlx::query(query)
            .bind(id.to_string())
            .bind(record.user_id.to_string())
            .bind(&record.token)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("insert token", e))?;

        Ok(id)
    }

    async fn find_active_by_token(&self, token: &str) -> Result<Option<TokenRecord>, DomainError> {
        let query = format!("{} WHERE token = ? AND is_active = TRUE", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("find token", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Option<TokenRecord>, DomainError> {
        let query = format!(
            "{} WHERE user_id = ? AND is_active = TRUE ORDER BY expires_at DESC, id DESC LIMIT 1",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("find user token", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn deactivate(&self, id: Uuid) -> Result<bool, DomainError> {
        let query = "UPDATE tokens SET is_active = FALSE WHERE id = ? AND is_active = TRUE";

        let result = sqlx::query(query)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("deactivate token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn deactivate_all_expired(&self, before: DateTime<Utc>) -> Result<u64, DomainError> {
        let query = "UPDATE tokens SET is_active = FALSE WHERE is_active = TRUE AND expires_at <= ?";

        let result = sqlx::query(query)
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("deactivate expired tokens", e))?;

        Ok(result.rows_affected())
    }

    async fn deactivate_all_for_user(
        &self,
        user_id: Uuid,
        superseded_by: Option<SessionRank>,
    ) -> Result<u64, DomainError> {
        let result = match superseded_by {
            Some(rank) => {
                sqlx::query(
                    "UPDATE tokens SET is_active = FALSE \
                     WHERE user_id = ? AND is_active = TRUE \
                     AND (expires_at < ? OR (expires_at = ? AND id < ?))",
                )
                .bind(user_id.to_string())
                .bind(rank.expires_at)
                .bind(rank.expires_at)
                .bind(rank.id.to_string())
                .execute(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "UPDATE tokens SET is_active = FALSE WHERE user_id = ? AND is_active = TRUE",
                )
                .bind(user_id.to_string())
                .execute(&self.pool)
                .await
            }
        }
        .map_err(|e| query_error("deactivate user tokens", e))?;

        Ok(result.rows_affected())
    }
}
