//! Error type definitions for authentication and token management.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; deliberately not told apart
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account inactive")]
    AccountInactive,

    #[error("User not found")]
    UserNotFound,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed, forged, revoked, superseded or unknown token
    #[error("Invalid token")]
    Invalid,

    /// Recognized token past its expiry, by claim or by store record
    #[error("Token expired")]
    Expired,

    #[error("Token signing failed: {message}")]
    SigningFailed { message: String },
}

impl TokenError {
    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        match self {
            TokenError::Invalid => Some(RejectionReason::Invalid),
            TokenError::Expired => Some(RejectionReason::Expired),
            TokenError::SigningFailed { .. } => None,
        }
    }
}

/// Why a presented token was refused
///
/// Tracked separately for diagnostics; clients see the same response for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    Invalid,
    Expired,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::Invalid => "invalid",
            RejectionReason::Expired => "expired",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
