//! Token signing, session policy and reaper configuration

use serde::{Deserialize, Serialize};

use super::{parsed_or, required, ConfigError};

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// HMAC secret used to sign session tokens
    pub secret: String,

    /// Session token time-to-live in seconds
    pub token_ttl: i64,

    /// Trailing interval before expiry in which a token is replaced, in seconds
    pub renewal_window: i64,

    /// JWT issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_ttl: 900,      // 15 minutes
            renewal_window: 300, // 5 minutes
            issuer: default_issuer(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set token TTL in minutes
    pub fn with_ttl_minutes(mut self, minutes: i64) -> Self {
        self.token_ttl = minutes * 60;
        self
    }

    /// Set renewal window in minutes
    pub fn with_renewal_window_minutes(mut self, minutes: i64) -> Self {
        self.renewal_window = minutes * 60;
        self
    }

    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            secret: required(lookup, "JWT_SECRET")?,
            token_ttl: parsed_or(lookup, "JWT_TOKEN_TTL", defaults.token_ttl),
            renewal_window: parsed_or(lookup, "JWT_RENEWAL_WINDOW", defaults.renewal_window),
            issuer: lookup("JWT_ISSUER").unwrap_or(defaults.issuer),
        })
    }
}

/// Session policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Keep at most one active token per user; issuing a new one retires the rest
    #[serde(default = "default_single_active")]
    pub single_active: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            single_active: default_single_active(),
        }
    }
}

/// Expired-token sweep scheduling
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReaperConfig {
    /// Seconds between sweeps
    pub interval: u64,

    /// Whether the background sweep runs at all
    pub enabled: bool,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            interval: 60,
            enabled: true,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Reaper configuration
    #[serde(default)]
    pub reaper: ReaperConfig,
}

impl AuthConfig {
    /// Create from environment-style lookup
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let reaper_defaults = ReaperConfig::default();
        Ok(Self {
            jwt: JwtConfig::from_lookup(lookup)?,
            session: SessionConfig {
                single_active: parsed_or(lookup, "SESSION_SINGLE_ACTIVE", default_single_active()),
            },
            reaper: ReaperConfig {
                interval: parsed_or(lookup, "REAPER_INTERVAL", reaper_defaults.interval),
                enabled: parsed_or(lookup, "REAPER_ENABLED", reaper_defaults.enabled),
            },
        })
    }

    /// Check that durations are positive and the window fits inside the TTL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.token_ttl <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_TOKEN_TTL".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.jwt.renewal_window < 0 || self.jwt.renewal_window >= self.jwt.token_ttl {
            return Err(ConfigError::Invalid {
                key: "JWT_RENEWAL_WINDOW".to_string(),
                message: format!(
                    "must be between 0 and the token TTL ({}s)",
                    self.jwt.token_ttl
                ),
            });
        }
        if self.reaper.interval == 0 {
            return Err(ConfigError::Invalid {
                key: "REAPER_INTERVAL".to_string(),
                message: "must be at least one second".to_string(),
            });
        }
        Ok(())
    }
}

fn default_issuer() -> String {
    String::from("wallet-auth")
}

fn default_single_active() -> bool {
    true
}
