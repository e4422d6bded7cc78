//! Token service facade

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::token::{IssuedToken, Principal, TokenRecord};
use crate::errors::DomainError;
use crate::repositories::TokenRepository;

use super::clock::{Clock, SystemClock};
use super::config::TokenServiceConfig;
use super::issuer::TokenIssuer;
use super::reaper::TokenReaper;
use super::refresher::{RefreshOutcome, TokenRefresher};
use super::validator::{TokenValidator, ValidatedSession};

/// Outcome of authenticating a request's bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub principal: Principal,
    /// Token the client should present from now on
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// True when `token` replaced the presented one
    pub refreshed: bool,
}

/// Verification entry point for request middleware
///
/// Implementors must return `Token(Invalid | Expired)` only for verdicts on
/// the token itself, and `Persistence` when the store could not be consulted.
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    /// Validate a bearer token, refreshing it when it is close to expiry
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedSession, DomainError>;

    /// Retire the record of a token; `Ok(false)` if it was not active
    async fn revoke(&self, token: &str) -> Result<bool, DomainError>;
}

/// Session token lifecycle: issue, validate, refresh and revoke
pub struct TokenService<R: TokenRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    issuer: Arc<TokenIssuer<R>>,
    validator: TokenValidator<R>,
    refresher: TokenRefresher<R>,
    config: TokenServiceConfig,
}

impl<R: TokenRepository + 'static> TokenService<R> {
    /// Creates a token service on the wall clock
    ///
    /// # Returns
    ///
    /// `Err(DomainError::Configuration)` if the configuration is unusable
    pub fn new(repository: Arc<R>, config: TokenServiceConfig) -> Result<Self, DomainError> {
        Self::with_clock(repository, config, Arc::new(SystemClock))
    }

    /// Creates a token service reading time from `clock`
    pub fn with_clock(
        repository: Arc<R>,
        config: TokenServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        if config.renewal_window >= config.token_ttl {
            return Err(DomainError::Configuration {
                message: "renewal window must be shorter than the token TTL".to_string(),
            });
        }

        let issuer = Arc::new(TokenIssuer::new(repository.clone(), &config, clock.clone())?);
        let validator = TokenValidator::new(repository.clone(), &config, clock.clone());
        let refresher = TokenRefresher::new(
            issuer.clone(),
            repository.clone(),
            clock.clone(),
            config.renewal_window,
        );

        Ok(Self {
            repository,
            clock,
            issuer,
            validator,
            refresher,
            config,
        })
    }

    /// Issue a new session token for a principal
    pub async fn issue(&self, principal: &Principal) -> Result<IssuedToken, DomainError> {
        self.issuer.issue(principal).await
    }

    /// Validate a token without refreshing it
    pub async fn validate(&self, token: &str) -> Result<Principal, DomainError> {
        self.validator.validate(token).await
    }

    /// Validate a token and return the record backing it
    pub async fn validate_session(&self, token: &str) -> Result<ValidatedSession, DomainError> {
        self.validator.validate_session(token).await
    }

    /// Retire the active record holding `token`
    pub async fn revoke(&self, token: &str) -> Result<bool, DomainError> {
        match self.repository.find_active_by_token(token).await? {
            Some(record) => {
                let revoked = self.repository.deactivate(record.id).await?;
                if revoked {
                    info!(
                        user_id = %record.user_id,
                        token_id = %record.id,
                        "Session token revoked"
                    );
                }
                Ok(revoked)
            }
            None => Ok(false),
        }
    }

    /// Retire every active record of a user
    pub async fn revoke_all(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let revoked = self.repository.deactivate_all_for_user(user_id, None).await?;
        info!(user_id = %user_id, revoked, "All session tokens revoked");
        Ok(revoked)
    }

    /// The user's most recently issued session, if it is still valid
    pub async fn active_session(&self, user_id: Uuid) -> Result<Option<TokenRecord>, DomainError> {
        let now = self.clock.now();
        Ok(self
            .repository
            .find_active_by_user(user_id)
            .await?
            .filter(|record| record.is_valid_at(now)))
    }

    /// Build a reaper over the same store and clock
    pub fn reaper(&self, interval: StdDuration, enabled: bool) -> TokenReaper<R> {
        TokenReaper::new(self.repository.clone(), self.clock.clone(), interval, enabled)
    }

    pub fn refresher(&self) -> &TokenRefresher<R> {
        &self.refresher
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }
}

#[async_trait]
impl<R: TokenRepository + 'static> SessionAuthenticator for TokenService<R> {
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedSession, DomainError> {
        let session = self.validator.validate_session(token).await?;
        let outcome = self.refresher.maybe_refresh(&session).await?;

        let (token, expires_at, refreshed) = match outcome {
            RefreshOutcome::Refreshed(issued) => (issued.token, issued.expires_at, true),
            RefreshOutcome::Unchanged(token) => (token, session.record.expires_at, false),
        };

        Ok(AuthenticatedSession {
            principal: session.principal,
            token,
            expires_at,
            refreshed,
        })
    }

    async fn revoke(&self, token: &str) -> Result<bool, DomainError> {
        TokenService::revoke(self, token).await
    }
}
