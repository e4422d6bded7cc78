//! User collaborator interface consumed by the login flow.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Read access to user accounts plus the credential check
///
/// Password hashing and comparison live entirely behind this trait; the
/// session subsystem never sees a hash.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with this ID
    /// * `Err(DomainError)` - Store error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by login email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Check a password against the stored credential
    ///
    /// # Returns
    /// * `Ok(true)` - Email exists and the password matches
    /// * `Ok(false)` - Unknown email or wrong password
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<bool, DomainError>;
}
