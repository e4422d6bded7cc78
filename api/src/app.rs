//! Application factory
//!
//! Builds the Actix-web application from the shared state: public auth
//! routes, session-protected routes behind [`JwtAuth`] and the health check.

use std::sync::Arc;

use actix_web::{web, App, HttpResponse};

use wa_core::repositories::{TokenRepository, UserRepository};
use wa_core::services::token::SessionAuthenticator;
use wa_shared::{error_codes, ErrorResponse};

use crate::middleware::auth::JwtAuth;
use crate::routes::{
    auth::{login::login, logout::logout},
    health::health_check,
    session::current_session,
    AppState,
};

/// Create and configure the application with all dependencies
pub fn create_app<U, R>(
    app_state: web::Data<AppState<U, R>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    R: TokenRepository + 'static,
{
    let authenticator: Arc<dyn SessionAuthenticator> = app_state.token_service.clone();
    let jwt_auth = JwtAuth::new(authenticator);

    App::new()
        .app_data(app_state)
        // Health check endpoint
        .route("/health", web::get().to(health_check::<U, R>))
        // API v1 routes
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(login::<U, R>))
                        .service(
                            web::resource("/logout")
                                .wrap(jwt_auth.clone())
                                .route(web::post().to(logout::<U, R>)),
                        ),
                )
                .service(
                    web::resource("/session")
                        .wrap(jwt_auth)
                        .route(web::get().to(current_session::<U, R>)),
                ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
