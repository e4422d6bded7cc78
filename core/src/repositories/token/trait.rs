//! Token repository trait defining the interface for session token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{NewTokenRecord, SessionRank, TokenRecord};
use crate::errors::DomainError;

/// Repository trait for TokenRecord persistence operations
///
/// Records are never deleted: the only mutation after insert is flipping
/// `is_active` to false, which implementations must perform as a
/// compare-and-set so concurrent deactivations of the same record are safe.
///
/// Every failure, including a timeout, is reported as
/// [`DomainError::Persistence`].
///
/// # Example
/// ```no_run
/// # use chrono::{Duration, Utc};
/// # use uuid::Uuid;
/// # use wa_core::domain::entities::token::NewTokenRecord;
/// # use wa_core::repositories::TokenRepository;
/// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
/// let id = repo
///     .insert(NewTokenRecord {
///         user_id: Uuid::new_v4(),
///         token: "header.claims.signature".to_string(),
///         expires_at: Utc::now() + Duration::minutes(15),
///     })
///     .await?;
///
/// assert!(repo.deactivate(id).await?);
/// assert!(!repo.deactivate(id).await?);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a new active record
    ///
    /// IDs are time-ordered (UUID v7) so [`SessionRank`] follows insertion
    /// order within a second.
    ///
    /// # Returns
    /// * `Ok(Uuid)` - The store-assigned record ID
    /// * `Err(DomainError)` - Connectivity or constraint failure
    async fn insert(&self, record: NewTokenRecord) -> Result<Uuid, DomainError>;

    /// Find the active record holding exactly this token string
    ///
    /// # Returns
    /// * `Ok(Some(TokenRecord))` - Active record found
    /// * `Ok(None)` - Unknown token, or the record is inactive
    async fn find_active_by_token(&self, token: &str) -> Result<Option<TokenRecord>, DomainError>;

    /// Find the most recently issued active record of a user
    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Option<TokenRecord>, DomainError>;

    /// Mark a record inactive
    ///
    /// # Returns
    /// * `Ok(true)` - This call flipped the record
    /// * `Ok(false)` - Already inactive or unknown; nothing changed
    async fn deactivate(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Mark every active record with `expires_at <= before` inactive
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of records this call deactivated
    async fn deactivate_all_expired(&self, before: DateTime<Utc>) -> Result<u64, DomainError>;

    /// Mark active records of a user inactive
    ///
    /// With `superseded_by` set, only records ranked strictly below it are
    /// touched. The record holding that rank survives, and a record issued
    /// later (by a racing login) is never retired by an older one.
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of records this call deactivated
    async fn deactivate_all_for_user(
        &self,
        user_id: Uuid,
        superseded_by: Option<SessionRank>,
    ) -> Result<u64, DomainError>;
}
