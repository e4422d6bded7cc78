//! HTTP route handlers

pub mod auth;
pub mod health;
pub mod session;

use std::sync::Arc;

use wa_core::repositories::{TokenRepository, UserRepository};
use wa_core::services::auth::AuthService;
use wa_core::services::token::TokenService;

use health::StoreHealth;

/// Shared state for every handler
pub struct AppState<U, R>
where
    U: UserRepository,
    R: TokenRepository + 'static,
{
    pub auth_service: Arc<AuthService<U, R>>,
    pub token_service: Arc<TokenService<R>>,
    pub store_health: Arc<dyn StoreHealth>,
}

impl<U, R> AppState<U, R>
where
    U: UserRepository,
    R: TokenRepository + 'static,
{
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService<R>>,
        store_health: Arc<dyn StoreHealth>,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(user_repository, token_service.clone())),
            token_service,
            store_health,
        }
    }
}
