//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, RejectionReason, TokenError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Token store unreachable, timed out or refused the write
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// Startup configuration is unusable
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Shorthand for a persistence failure
    pub fn persistence(message: impl Into<String>) -> Self {
        DomainError::Persistence {
            message: message.into(),
        }
    }

    /// The rejection reason when this error rejects a presented token
    ///
    /// Persistence failures return `None`: a store outage is an
    /// infrastructure failure, not a verdict on the token.
    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            DomainError::Token(token_error) => token_error.rejection_reason(),
            _ => None,
        }
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, DomainError::Persistence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_mapping() {
        assert_eq!(
            DomainError::Token(TokenError::Invalid).rejection(),
            Some(RejectionReason::Invalid)
        );
        assert_eq!(
            DomainError::Token(TokenError::Expired).rejection(),
            Some(RejectionReason::Expired)
        );
        assert_eq!(
            DomainError::Token(TokenError::SigningFailed {
                message: "bad key".to_string()
            })
            .rejection(),
            None
        );
        assert_eq!(DomainError::persistence("timeout").rejection(), None);
        assert!(DomainError::persistence("timeout").is_persistence());
    }

    #[test]
    fn test_error_display() {
        let err: DomainError = TokenError::Expired.into();
        assert_eq!(err.to_string(), "Token expired");

        let err = DomainError::persistence("store operation timed out after 5000ms");
        assert_eq!(
            err.to_string(),
            "Persistence error: store operation timed out after 5000ms"
        );
    }
}
