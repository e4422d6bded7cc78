use actix_web::{web, HttpResponse};
use validator::Validate;

use wa_core::repositories::{TokenRepository, UserRepository};

use crate::dto::auth::{LoginRequest, LoginResponse};
use crate::handlers::error::ApiError;

use super::super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// # Request Body
///
/// ```json
/// {
///     "email": "alice@example.com",
///     "password": "correct horse"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "token_type": "Bearer",
///     "expires_at": "2024-05-01T12:15:00Z",
///     "expires_in": 900,
///     "user": { "id": "...", "username": "alice", "email": "alice@example.com" }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed email or empty password
/// - 401 Unauthorized: Unknown email or wrong password
/// - 403 Forbidden: Account inactive
/// - 503 Service Unavailable: Session store unreachable
pub async fn login<U, R>(
    state: web::Data<AppState<U, R>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    R: TokenRepository + 'static,
{
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let result = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token: result.token,
        token_type: "Bearer".to_string(),
        expires_at: result.expires_at,
        expires_in: state.token_service.config().token_ttl.num_seconds(),
        user: result.user.into(),
    }))
}
