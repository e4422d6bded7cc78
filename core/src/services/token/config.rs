//! Configuration for the token services

use chrono::Duration;
use wa_shared::config::AuthConfig;

/// Configuration for the token services
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HMAC-SHA256 signing secret
    pub jwt_secret: String,
    /// JWT issuer claim
    pub issuer: String,
    /// Session token time-to-live
    pub token_ttl: Duration,
    /// Tokens with less than this left are replaced on use
    pub renewal_window: Duration,
    /// Retire a user's older sessions whenever a new token is issued
    pub single_active: bool,
}

impl TokenServiceConfig {
    /// Build from the application's auth configuration
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self {
            jwt_secret: config.jwt.secret.clone(),
            issuer: config.jwt.issuer.clone(),
            token_ttl: Duration::seconds(config.jwt.token_ttl),
            renewal_window: Duration::seconds(config.jwt.renewal_window),
            single_active: config.session.single_active,
        }
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            issuer: "wallet-auth".to_string(),
            token_ttl: Duration::minutes(15),
            renewal_window: Duration::minutes(5),
            single_active: true,
        }
    }
}
