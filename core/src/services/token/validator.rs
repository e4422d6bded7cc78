//! Presented-token validation

use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::debug;

use crate::domain::entities::token::{Claims, Principal, TokenRecord};
use crate::errors::{DomainError, TokenError};
use crate::repositories::TokenRepository;

use super::clock::Clock;
use super::config::TokenServiceConfig;

/// A token that passed every validation step, with the record backing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSession {
    pub principal: Principal,
    pub record: TokenRecord,
}

/// Checks presented tokens against their signature, their embedded expiry
/// and the token store
///
/// Steps, in order:
/// 1. Signature and issuer; failure is `Invalid`
/// 2. Claim expiry; failure is `Expired` and skips the store
/// 3. Active store record for the exact token string; absent is `Invalid`
/// 4. Store record expiry; failure is `Expired`
pub struct TokenValidator<R: TokenRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<R: TokenRepository> TokenValidator<R> {
    pub fn new(repository: Arc<R>, config: &TokenServiceConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        // Expiry is compared against the injected clock below
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            repository,
            clock,
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Validates a token and returns the principal it represents
    pub async fn validate(&self, token: &str) -> Result<Principal, DomainError> {
        Ok(self.validate_session(token).await?.principal)
    }

    /// Validates a token and returns the principal along with its record
    ///
    /// # Returns
    ///
    /// * `Ok(ValidatedSession)` - Token accepted
    /// * `Err(DomainError::Token(Invalid | Expired))` - Token rejected
    /// * `Err(DomainError::Persistence)` - The store could not be consulted;
    ///   no verdict on the token
    pub async fn validate_session(&self, token: &str) -> Result<ValidatedSession, DomainError> {
        let claims = self.decode_claims(token)?;
        let principal = claims
            .principal()
            .map_err(|_| reject(TokenError::Invalid, "bad uid claim"))?;

        let now = self.clock.now();
        if claims.is_expired_at(now) {
            return Err(reject(TokenError::Expired, "claims expired"));
        }

        let record = self
            .repository
            .find_active_by_token(token)
            .await?
            .ok_or_else(|| reject(TokenError::Invalid, "no active record"))?;

        if record.user_id != principal.user_id {
            return Err(reject(TokenError::Invalid, "record owner does not match claims"));
        }

        if record.is_expired_at(now) {
            return Err(reject(TokenError::Expired, "record expired"));
        }

        Ok(ValidatedSession { principal, record })
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token failed signature verification");
                TokenError::Invalid.into()
            })
    }
}

fn reject(error: TokenError, step: &'static str) -> DomainError {
    debug!(reason = ?error.rejection_reason(), step, "Token rejected");
    error.into()
}
