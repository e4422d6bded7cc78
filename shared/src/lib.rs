//! Shared configuration and response types for the wallet auth server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded once at process start
//! - Error response structures and error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, DatabaseConfig, Environment, JwtConfig, LogFormat,
    LoggingConfig, ReaperConfig, ServerConfig, SessionConfig,
};
pub use errors::{error_codes, ErrorResponse};
