//! In-memory implementation of UserRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::r#trait::UserRepository;

/// Mock user repository storing plain passwords
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, (User, String)>>>,
    latency_ms: Arc<AtomicU64>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user with a password
    pub async fn add_user(&self, user: User, password: impl Into<String>) {
        self.users
            .write()
            .await
            .insert(user.id, (user, password.into()));
    }

    /// Delay every lookup by `latency`
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    async fn delay(&self) {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
    }

    /// Flip a user's active flag
    pub async fn set_active(&self, id: Uuid, active: bool) {
        if let Some((user, _)) = self.users.write().await.get_mut(&id) {
            user.is_active = active;
        }
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.delay().await;
        Ok(self.users.read().await.get(&id).map(|(u, _)| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.delay().await;
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<bool, DomainError> {
        self.delay().await;
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|(u, p)| u.email == email && p == password))
    }
}
