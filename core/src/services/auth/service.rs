//! Main authentication service implementation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::token::TokenService;

/// Successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Authentication service for the login flow
pub struct AuthService<U, R>
where
    U: UserRepository,
    R: TokenRepository + 'static,
{
    /// User collaborator for lookups and credential checks
    user_repository: Arc<U>,
    /// Token service for session management
    token_service: Arc<TokenService<R>>,
}

impl<U, R> AuthService<U, R>
where
    U: UserRepository,
    R: TokenRepository + 'static,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - User lookups and credential checks
    /// * `token_service` - Session token management
    pub fn new(user_repository: Arc<U>, token_service: Arc<TokenService<R>>) -> Self {
        Self {
            user_repository,
            token_service,
        }
    }

    /// Authenticate with email and password and open a session
    ///
    /// An unknown email and a wrong password fail the same way. The account
    /// state is only revealed once the password has been verified.
    ///
    /// # Returns
    ///
    /// * `Ok(LoginResult)` - The user and the new session token
    /// * `Err(DomainError::Auth(InvalidCredentials | AccountInactive))`
    /// * `Err(DomainError::Persistence)` - A store was unavailable
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, DomainError> {
        let email = email.trim();

        if !self
            .user_repository
            .verify_credentials(email, password)
            .await?
        {
            warn!("Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials.into());
        }

        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            warn!(user_id = %user.id, "Login refused: account inactive");
            return Err(AuthError::AccountInactive.into());
        }

        let issued = self.token_service.issue(&user.principal()).await?;
        info!(user_id = %user.id, token_id = %issued.record_id, "User logged in");

        Ok(LoginResult {
            user,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    /// End the session holding `token`
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the session was active, `Ok(false)` if it was already gone
    pub async fn logout(&self, token: &str) -> Result<bool, DomainError> {
        self.token_service.revoke(token).await
    }

    /// End every session of a user
    pub async fn logout_all(&self, user_id: Uuid) -> Result<u64, DomainError> {
        self.token_service.revoke_all(user_id).await
    }

    /// Load the user behind an authenticated session
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    pub fn token_service(&self) -> &Arc<TokenService<R>> {
        &self.token_service
    }
}
