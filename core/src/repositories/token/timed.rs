//! Deadline-bounded token store.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{NewTokenRecord, SessionRank, TokenRecord};
use crate::errors::DomainError;
use crate::repositories::deadline;

use super::r#trait::TokenRepository;

/// Wraps a [`TokenRepository`] so that no operation waits longer than `timeout`
///
/// An elapsed deadline becomes [`DomainError::Persistence`]. The caller must
/// not assume the operation did or did not take effect.
pub struct TimedTokenRepository<R> {
    inner: R,
    timeout: Duration,
}

impl<R: TokenRepository> TimedTokenRepository<R> {
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        deadline::bounded("token", operation, self.timeout, fut).await
    }
}

#[async_trait]
impl<R: TokenRepository> TokenRepository for TimedTokenRepository<R> {
    async fn insert(&self, record: NewTokenRecord) -> Result<Uuid, DomainError> {
        self.bounded("insert", self.inner.insert(record)).await
    }

    async fn find_active_by_token(&self, token: &str) -> Result<Option<TokenRecord>, DomainError> {
        self.bounded("find_active_by_token", self.inner.find_active_by_token(token))
            .await
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Option<TokenRecord>, DomainError> {
        self.bounded("find_active_by_user", self.inner.find_active_by_user(user_id))
            .await
    }

    async fn deactivate(&self, id: Uuid) -> Result<bool, DomainError> {
        self.bounded("deactivate", self.inner.deactivate(id)).await
    }

    async fn deactivate_all_expired(&self, before: DateTime<Utc>) -> Result<u64, DomainError> {
        self.bounded(
            "deactivate_all_expired",
            self.inner.deactivate_all_expired(before),
        )
        .await
    }

    async fn deactivate_all_for_user(
        &self,
        user_id: Uuid,
        superseded_by: Option<SessionRank>,
    ) -> Result<u64, DomainError> {
        self.bounded(
            "deactivate_all_for_user",
            self.inner.deactivate_all_for_user(user_id, superseded_by),
        )
        .await
    }
}
