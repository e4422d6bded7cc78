//! Database configuration module

use serde::{Deserialize, Serialize};

use super::{parsed_or, required, ConfigError};

/// Connection and pool configuration for the token/user store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection (pool acquire) timeout in seconds
    pub connect_timeout: u64,

    /// Upper bound for a single store operation in milliseconds
    pub operation_timeout_ms: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout: u64,

    /// Maximum lifetime of a connection in seconds
    pub max_lifetime: u64,

    /// Slow query threshold in milliseconds
    #[serde(default = "default_slow_query_threshold")]
    pub slow_query_threshold: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            connect_timeout: 10,
            operation_timeout_ms: 5000,
            idle_timeout: 600,
            max_lifetime: 1800,
            slow_query_threshold: default_slow_query_threshold(),
        }
    }
}

impl DatabaseConfig {
    /// Create from environment-style lookup
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            url: required(lookup, "DATABASE_URL")?,
            max_connections: parsed_or(lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections),
            connect_timeout: parsed_or(lookup, "DATABASE_CONNECT_TIMEOUT", defaults.connect_timeout),
            operation_timeout_ms: parsed_or(
                lookup,
                "DATABASE_OPERATION_TIMEOUT_MS",
                defaults.operation_timeout_ms,
            ),
            ..defaults
        })
    }

    /// Create a new database configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the maximum number of connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the per-operation timeout
    pub fn with_operation_timeout_ms(mut self, millis: u64) -> Self {
        self.operation_timeout_ms = millis;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.operation_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_OPERATION_TIMEOUT_MS".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

fn default_slow_query_threshold() -> u64 {
    1000
}
