//! In-memory implementation of TokenRepository for testing and local runs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::{NewTokenRecord, SessionRank, TokenRecord};
use crate::errors::DomainError;

use super::r#trait::TokenRepository;

/// Mock token repository
///
/// Holds records in memory behind a `tokio` lock. `set_unavailable` makes
/// every call fail like a store outage and `set_latency` delays every call,
/// which lets tests exercise the persistence error paths.
#[derive(Clone)]
pub struct MockTokenRepository {
    records: Arc<RwLock<HashMap<Uuid, TokenRecord>>>,
    unavailable: Arc<AtomicBool>,
    latency_ms: Arc<AtomicU64>,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            unavailable: Arc::new(AtomicBool::new(false)),
            latency_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Simulate the store going down or coming back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delay every operation by `latency`
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Fetch a record regardless of its state
    pub async fn get(&self, id: Uuid) -> Option<TokenRecord> {
        self.records.read().await.get(&id).cloned()
    }

    /// Snapshot of every stored record
    pub async fn all_records(&self) -> Vec<TokenRecord> {
        self.records.read().await.values().cloned().collect()
    }

    /// Number of active records of a user
    pub async fn count_active_for_user(&self, user_id: Uuid) -> usize {
        self.records
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id && r.is_active)
            .count()
    }

    async fn enter(&self) -> Result<(), DomainError> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::persistence("token store unreachable"));
        }
        Ok(())
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn insert(&self, record: NewTokenRecord) -> Result<Uuid, DomainError> {
        self.enter().await?;
        let mut records = self.records.write().await;

        // Check for duplicate
        if records
            .values()
            .any(|r| r.is_active && r.token == record.token)
        {
            return Err(DomainError::persistence("duplicate active token"));
        }

        let id = Uuid::now_v7();
        records.insert(id, record.into_record(id));
        Ok(id)
    }

    async fn find_active_by_token(&self, token: &str) -> Result<Option<TokenRecord>, DomainError> {
        self.enter().await?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.is_active && r.token == token)
            .cloned())
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Option<TokenRecord>, DomainError> {
        self.enter().await?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.is_active && r.user_id == user_id)
            .max_by_key(|r| r.rank())
            .cloned())
    }

    async fn deactivate(&self, id: Uuid) -> Result<bool, DomainError> {
        self.enter().await?;
        let mut records = self.records.write().await;

        match records.get_mut(&id) {
            Some(record) if record.is_active => {
                record.deactivate();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn deactivate_all_expired(&self, before: DateTime<Utc>) -> Result<u64, DomainError> {
        self.enter().await?;
        let mut records = self.records.write().await;
        let mut count = 0;

        for record in records.values_mut() {
            if record.is_active && record.expires_at <= before {
                record.deactivate();
                count += 1;
            }
        }

        Ok(count)
    }

    async fn deactivate_all_for_user(
        &self,
        user_id: Uuid,
        superseded_by: Option<SessionRank>,
    ) -> Result<u64, DomainError> {
        self.enter().await?;
        let mut records = self.records.write().await;
        let mut count = 0;

        for record in records.values_mut() {
            let superseded = superseded_by.map_or(true, |rank| record.rank() < rank);
            if record.user_id == user_id && record.is_active && superseded {
                record.deactivate();
                count += 1;
            }
        }

        Ok(count)
    }
}
