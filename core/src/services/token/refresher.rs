//! Sliding-window token refresh

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::domain::entities::token::IssuedToken;
use crate::errors::DomainError;
use crate::repositories::TokenRepository;

use super::clock::Clock;
use super::issuer::TokenIssuer;
use super::validator::ValidatedSession;

/// What a refresh attempt did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Outside the renewal window; the presented token stays in use
    Unchanged(String),
    /// A replacement was issued and the old record retired
    Refreshed(IssuedToken),
}

impl RefreshOutcome {
    /// The token the client should use from now on
    pub fn token(&self) -> &str {
        match self {
            RefreshOutcome::Unchanged(token) => token,
            RefreshOutcome::Refreshed(issued) => &issued.token,
        }
    }

    pub fn is_refreshed(&self) -> bool {
        matches!(self, RefreshOutcome::Refreshed(_))
    }
}

/// Replaces validated tokens that are close to expiry
pub struct TokenRefresher<R: TokenRepository> {
    issuer: Arc<TokenIssuer<R>>,
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    renewal_window: Duration,
}

impl<R: TokenRepository> TokenRefresher<R> {
    pub fn new(
        issuer: Arc<TokenIssuer<R>>,
        repository: Arc<R>,
        clock: Arc<dyn Clock>,
        renewal_window: Duration,
    ) -> Self {
        Self {
            issuer,
            repository,
            clock,
            renewal_window,
        }
    }

    /// Refresh a session if less than the renewal window is left
    ///
    /// The replacement is issued before the old record is retired, so a
    /// failed issue leaves the presented token usable. A failure to retire
    /// the old record after a successful issue is logged and the new token is
    /// still returned; the old record then lapses at its own expiry.
    pub async fn maybe_refresh(
        &self,
        session: &ValidatedSession,
    ) -> Result<RefreshOutcome, DomainError> {
        let remaining = session.record.time_until_expiration(self.clock.now());
        if remaining >= self.renewal_window {
            return Ok(RefreshOutcome::Unchanged(session.record.token.clone()));
        }

        let issued = self.issuer.issue(&session.principal).await?;

        match self.repository.deactivate(session.record.id).await {
            Ok(true) => info!(
                user_id = %session.principal.user_id,
                old_token_id = %session.record.id,
                new_token_id = %issued.record_id,
                "Session token refreshed"
            ),
            Ok(false) => debug!(
                old_token_id = %session.record.id,
                "Refreshed token was already inactive"
            ),
            Err(e) => warn!(
                old_token_id = %session.record.id,
                error = %e,
                "Failed to retire refreshed token"
            ),
        }

        Ok(RefreshOutcome::Refreshed(issued))
    }

    pub fn renewal_window(&self) -> Duration {
        self.renewal_window
    }
}
