//! Token service module for session token management
//!
//! This module handles the whole session token lifecycle:
//! - Signed token issuance backed by a persisted record
//! - Validation of presented tokens against signature, expiry and store state
//! - Sliding-window refresh near expiry
//! - Background retirement of expired records

mod clock;
mod config;
mod issuer;
mod reaper;
mod refresher;
mod service;
mod validator;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TokenServiceConfig;
pub use issuer::TokenIssuer;
pub use reaper::{SweepOutcome, TokenReaper};
pub use refresher::{RefreshOutcome, TokenRefresher};
pub use service::{AuthenticatedSession, SessionAuthenticator, TokenService};
pub use validator::{TokenValidator, ValidatedSession};
