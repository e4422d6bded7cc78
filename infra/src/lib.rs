//! # Infrastructure Layer
//!
//! Concrete store implementations for the wallet auth backend.
//!
//! ## Architecture
//!
//! - **Database**: MySQL connection pool, schema bootstrap and the token and
//!   user repositories, all using SQLx

// Re-export core types for convenience
pub use wa_core::errors::*;

/// Database module - MySQL implementations using SQLx
pub mod database;

pub use database::{DatabasePool, MySqlTokenRepository, MySqlUserRepository, PoolStatistics};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
