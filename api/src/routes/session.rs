use actix_web::{web, HttpResponse};

use wa_core::repositories::{TokenRepository, UserRepository};

use crate::dto::auth::SessionResponse;
use crate::handlers::error::ApiError;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for GET /api/v1/session
///
/// Returns the user behind the presented session token.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {token}
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing, invalid or expired token
/// - 503 Service Unavailable: Session store unreachable
pub async fn current_session<U, R>(
    state: web::Data<AppState<U, R>>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    R: TokenRepository + 'static,
{
    let user = state.auth_service.current_user(auth.user_id).await?;

    Ok(HttpResponse::Ok().json(SessionResponse {
        user: user.into(),
        expires_at: auth.expires_at,
        refreshed: auth.refreshed,
    }))
}
