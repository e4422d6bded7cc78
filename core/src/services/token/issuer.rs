//! Signed token issuance

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tracing::{debug, info, warn};

use crate::domain::entities::token::{
    Claims, IssuedToken, NewTokenRecord, Principal, SessionRank, MAX_TOKEN_LENGTH,
};
use crate::errors::{DomainError, TokenError};
use crate::repositories::TokenRepository;

use super::clock::Clock;
use super::config::TokenServiceConfig;

/// Creates signed session tokens and the store records backing them
pub struct TokenIssuer<R: TokenRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    encoding_key: EncodingKey,
    header: Header,
    issuer: String,
    token_ttl: Duration,
    single_active: bool,
}

impl<R: TokenRepository> TokenIssuer<R> {
    /// Creates a new issuer
    ///
    /// # Returns
    ///
    /// `Err(DomainError::Configuration)` if the signing secret is empty or
    /// the TTL is not positive
    pub fn new(
        repository: Arc<R>,
        config: &TokenServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        if config.jwt_secret.is_empty() {
            return Err(DomainError::Configuration {
                message: "JWT signing secret must not be empty".to_string(),
            });
        }
        if config.token_ttl <= Duration::zero() {
            return Err(DomainError::Configuration {
                message: "token TTL must be positive".to_string(),
            });
        }

        Ok(Self {
            repository,
            clock,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            header: Header::new(Algorithm::HS256),
            issuer: config.issuer.clone(),
            token_ttl: config.token_ttl,
            single_active: config.single_active,
        })
    }

    /// Issues a token for a principal
    ///
    /// The token is only returned once its record is persisted. When
    /// single-session mode is on, every other active record of the user that
    /// ranks below the new one is retired afterwards.
    /// A token longer than [`MAX_TOKEN_LENGTH`] is refused before it reaches
    /// the store.
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedToken)` - The signed token and its persisted record ID
    /// * `Err(DomainError::Token(SigningFailed))` - Signing failed
    /// * `Err(DomainError::Persistence)` - The store write failed
    pub async fn issue(&self, principal: &Principal) -> Result<IssuedToken, DomainError> {
        let issued_at = self.clock.now();
        let expires_at = whole_seconds(issued_at + self.token_ttl)?;

        let claims = Claims::new(principal, issued_at, expires_at, &self.issuer);
        let token = encode(&self.header, &claims, &self.encoding_key).map_err(|e| {
            TokenError::SigningFailed {
                message: e.to_string(),
            }
        })?;
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(TokenError::SigningFailed {
                message: format!(
                    "signed token is {} bytes, limit is {}",
                    token.len(),
                    MAX_TOKEN_LENGTH
                ),
            }
            .into());
        }

        let record_id = self
            .repository
            .insert(NewTokenRecord {
                user_id: principal.user_id,
                token: token.clone(),
                expires_at,
            })
            .await?;

        debug!(
            user_id = %principal.user_id,
            token_id = %record_id,
            expires_at = %expires_at,
            "Session token issued"
        );

        if self.single_active {
            match self
                .repository
                .deactivate_all_for_user(
                    principal.user_id,
                    Some(SessionRank {
                        expires_at,
                        id: record_id,
                    }),
                )
                .await
            {
                Ok(0) => {}
                Ok(retired) => info!(
                    user_id = %principal.user_id,
                    retired,
                    "Retired superseded sessions"
                ),
                Err(e) => warn!(
                    user_id = %principal.user_id,
                    error = %e,
                    "Failed to retire superseded sessions"
                ),
            }
        }

        Ok(IssuedToken {
            record_id,
            token,
            expires_at,
        })
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}

/// JWT `exp` has second precision; the record must carry the same instant
fn whole_seconds(instant: DateTime<Utc>) -> Result<DateTime<Utc>, DomainError> {
    Utc.timestamp_opt(instant.timestamp(), 0)
        .single()
        .ok_or_else(|| DomainError::Internal {
            message: format!("expiry timestamp out of range: {}", instant),
        })
}
