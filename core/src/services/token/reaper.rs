//! Background retirement of expired token records
//!
//! Validation already refuses expired records; the reaper keeps the store's
//! `is_active` flag honest so that active-session queries and audits see the
//! same picture.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::TokenRepository;

use super::clock::Clock;

/// Periodic sweep over the token store
pub struct TokenReaper<R: TokenRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    enabled: bool,
}

impl<R: TokenRepository> TokenReaper<R> {
    pub fn new(
        repository: Arc<R>,
        clock: Arc<dyn Clock>,
        interval: Duration,
        enabled: bool,
    ) -> Self {
        Self {
            repository,
            clock,
            interval,
            enabled,
        }
    }

    /// Deactivate every active record with `expires_at <= now`
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of records retired by this sweep
    /// * `Err(DomainError)` - The store failed; nothing is retried here
    pub async fn sweep(&self) -> Result<u64, DomainError> {
        self.repository.deactivate_all_expired(self.clock.now()).await
    }

    /// Run one sweep and report instead of failing
    pub async fn run_once(&self) -> SweepOutcome {
        match self.sweep().await {
            Ok(deactivated) => {
                if deactivated > 0 {
                    info!(deactivated, "Expired session tokens retired");
                }
                SweepOutcome {
                    deactivated,
                    error: None,
                }
            }
            Err(e) => {
                error!(error = %e, "Token sweep failed; retrying next tick");
                SweepOutcome {
                    deactivated: 0,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Start the reaper as a background task
    ///
    /// Returns `None` when the reaper is disabled. The task never exits on
    /// store errors; abort the handle to stop it.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.enabled {
            warn!("Token reaper is disabled");
            return None;
        }

        Some(tokio::spawn(async move {
            info!(
                interval_secs = self.interval.as_secs(),
                "Token reaper started"
            );

            let mut interval_timer = tokio::time::interval(self.interval);

            loop {
                interval_timer.tick().await;
                self.run_once().await;
            }
        }))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Result of a single sweep
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Number of records retired
    pub deactivated: u64,
    /// Store error, if the sweep failed
    pub error: Option<String>,
}

impl SweepOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
