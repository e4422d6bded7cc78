//! Mapping of domain failures to HTTP responses

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use tracing::{error, warn};

use wa_core::errors::{AuthError, DomainError, TokenError};
use wa_shared::{error_codes, ErrorResponse};

/// Errors surfaced by handlers and the auth middleware
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No `Authorization: Bearer` header
    #[error("Missing or malformed Authorization header")]
    MissingCredentials,

    /// Request body failed validation
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    fn code_and_message(&self) -> (&'static str, String) {
        match self {
            ApiError::MissingCredentials => (error_codes::UNAUTHORIZED, self.to_string()),
            ApiError::Validation(_) => (error_codes::VALIDATION_ERROR, self.to_string()),
            ApiError::Domain(domain) => match domain {
                // Invalid and expired tokens are indistinguishable to clients
                DomainError::Token(TokenError::Invalid | TokenError::Expired) => (
                    error_codes::TOKEN_INVALID,
                    "Invalid or expired token".to_string(),
                ),
                DomainError::Auth(AuthError::InvalidCredentials) => (
                    error_codes::INVALID_CREDENTIALS,
                    "Invalid email or password".to_string(),
                ),
                DomainError::Auth(AuthError::AccountInactive) => (
                    error_codes::ACCOUNT_INACTIVE,
                    "Account is inactive".to_string(),
                ),
                DomainError::Auth(AuthError::UserNotFound) => {
                    (error_codes::NOT_FOUND, "User not found".to_string())
                }
                DomainError::Persistence { .. } => (
                    error_codes::SERVICE_UNAVAILABLE,
                    "Session store unavailable, please retry".to_string(),
                ),
                DomainError::Token(TokenError::SigningFailed { .. })
                | DomainError::Configuration { .. }
                | DomainError::Internal { .. } => (
                    error_codes::INTERNAL_ERROR,
                    "An internal error occurred".to_string(),
                ),
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(domain) => match domain {
                DomainError::Token(TokenError::Invalid | TokenError::Expired) => {
                    StatusCode::UNAUTHORIZED
                }
                DomainError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
                DomainError::Auth(AuthError::AccountInactive) => StatusCode::FORBIDDEN,
                DomainError::Auth(AuthError::UserNotFound) => StatusCode::NOT_FOUND,
                DomainError::Persistence { .. } => StatusCode::SERVICE_UNAVAILABLE,
                DomainError::Token(TokenError::SigningFailed { .. })
                | DomainError::Configuration { .. }
                | DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else if let ApiError::Domain(domain) = self {
            if let Some(reason) = domain.rejection() {
                warn!(%reason, "Bearer token rejected");
            }
        }

        let (code, message) = self.code_and_message();
        HttpResponse::build(status).json(ErrorResponse::new(code, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(error: ApiError) -> serde_json::Value {
        let bytes = to_bytes(error.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_invalid_and_expired_look_identical() {
        let invalid = ApiError::from(DomainError::Token(TokenError::Invalid));
        let expired = ApiError::from(DomainError::Token(TokenError::Expired));

        assert_eq!(invalid.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(expired.status_code(), StatusCode::UNAUTHORIZED);

        let invalid = body_of(invalid).await;
        let expired = body_of(expired).await;
        assert_eq!(invalid["error"], expired["error"]);
        assert_eq!(invalid["message"], expired["message"]);
        assert_eq!(invalid["error"], error_codes::TOKEN_INVALID);
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::MissingCredentials, StatusCode::UNAUTHORIZED),
            (
                ApiError::Validation("email".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::persistence("timed out").into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                DomainError::Token(TokenError::SigningFailed {
                    message: "bad key".to_string(),
                })
                .into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::Auth(AuthError::AccountInactive).into(),
                StatusCode::FORBIDDEN,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status_code(), status, "{:?}", error);
        }
    }
}
