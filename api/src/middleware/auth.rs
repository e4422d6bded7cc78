//! Bearer token authentication middleware for protecting API endpoints.
//!
//! This middleware extracts the session token from the Authorization header,
//! authenticates it through a [`SessionAuthenticator`] and injects the
//! resulting [`AuthContext`] into the request. When the token was refreshed
//! on the way through, the replacement is returned to the client in the
//! `X-Refreshed-Token` response header.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue, AUTHORIZATION},
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use wa_core::services::token::{AuthenticatedSession, SessionAuthenticator};

use crate::handlers::error::ApiError;

/// Response header carrying a refreshed session token
pub const REFRESHED_TOKEN_HEADER: &str = "x-refreshed-token";

/// Session context injected into authenticated requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Owning user ID
    pub user_id: Uuid,
    /// Token subject (the user's email)
    pub subject: String,
    /// Token the client holds after this request
    pub token: String,
    /// Expiry of `token`
    pub expires_at: DateTime<Utc>,
    /// Whether `token` replaced the presented one
    pub refreshed: bool,
}

impl From<AuthenticatedSession> for AuthContext {
    fn from(session: AuthenticatedSession) -> Self {
        Self {
            user_id: session.principal.user_id,
            subject: session.principal.subject,
            token: session.token,
            expires_at: session.expires_at,
            refreshed: session.refreshed,
        }
    }
}

/// Bearer token authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    authenticator: Arc<dyn SessionAuthenticator>,
}

impl JwtAuth {
    /// Creates a new authentication middleware backed by `authenticator`
    pub fn new(authenticator: Arc<dyn SessionAuthenticator>) -> Self {
        Self { authenticator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            authenticator: self.authenticator.clone(),
        }))
    }
}

/// Bearer token authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    authenticator: Arc<dyn SessionAuthenticator>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let authenticator = self.authenticator.clone();

        Box::pin(async move {
            let Some(token) = extract_bearer_token(&req) else {
                return Ok(reject(req, ApiError::MissingCredentials));
            };

            let session = match authenticator.authenticate(&token).await {
                Ok(session) => session,
                Err(e) => return Ok(reject(req, e.into())),
            };

            let refreshed_token = session.refreshed.then(|| session.token.clone());
            req.extensions_mut().insert(AuthContext::from(session));

            let mut res = service.call(req).await?.map_into_left_body();

            if let Some(token) = refreshed_token {
                match HeaderValue::from_str(&token) {
                    Ok(value) => {
                        res.headers_mut()
                            .insert(HeaderName::from_static(REFRESHED_TOKEN_HEADER), value);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Refreshed token is not a valid header value")
                    }
                }
            }

            Ok(res)
        })
    }
}

/// Short-circuit the request with the error's JSON response
fn reject<B>(req: ServiceRequest, error: ApiError) -> ServiceResponse<EitherBody<B>> {
    req.into_response(error.error_response()).map_into_right_body()
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::MissingCredentials.into());

        ready(result)
    }
}
