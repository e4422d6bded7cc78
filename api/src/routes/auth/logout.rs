use actix_web::{web, HttpResponse};

use wa_core::repositories::{TokenRepository, UserRepository};

use crate::dto::auth::{LogoutQuery, LogoutResponse};
use crate::handlers::error::ApiError;
use crate::middleware::auth::AuthContext;

use super::super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the session token the request authenticated with, or every
/// session of the user with `?all=true`.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logged out successfully",
///     "revoked": 1
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing, invalid or expired token
/// - 503 Service Unavailable: Session store unreachable
pub async fn logout<U, R>(
    state: web::Data<AppState<U, R>>,
    auth: AuthContext,
    query: web::Query<LogoutQuery>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    R: TokenRepository + 'static,
{
    let revoked = if query.all {
        state.auth_service.logout_all(auth.user_id).await?
    } else {
        u64::from(state.auth_service.logout(&auth.token).await?)
    };

    Ok(HttpResponse::Ok().json(LogoutResponse {
        message: "Logged out successfully".to_string(),
        revoked,
    }))
}
