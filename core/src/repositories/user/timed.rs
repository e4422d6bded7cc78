//! Deadline-bounded user store.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;
use crate::repositories::deadline::bounded;

use super::r#trait::UserRepository;

/// Wraps a [`UserRepository`] so that login lookups cannot hang
///
/// The deadline covers the whole credential check, password comparison
/// included. An elapsed deadline becomes [`DomainError::Persistence`].
pub struct TimedUserRepository<U> {
    inner: U,
    timeout: Duration,
}

impl<U: UserRepository> TimedUserRepository<U> {
    pub fn new(inner: U, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<U: UserRepository> UserRepository for TimedUserRepository<U> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        bounded("user", "find_by_id", self.timeout, self.inner.find_by_id(id)).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        bounded(
            "user",
            "find_by_email",
            self.timeout,
            self.inner.find_by_email(email),
        )
        .await
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<bool, DomainError> {
        bounded(
            "user",
            "verify_credentials",
            self.timeout,
            self.inner.verify_credentials(email, password),
        )
        .await
    }
}
