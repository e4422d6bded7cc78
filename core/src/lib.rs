//! # Wallet Auth Core
//!
//! Session token lifecycle for the wallet auth backend.
//! This crate contains the token and user entities, repository interfaces,
//! the token services (issuer, validator, refresher, reaper) and the login
//! service built on top of them.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
