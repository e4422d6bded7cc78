//! End-to-end tests for the HTTP surface over in-memory stores

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use actix_web::{http::StatusCode, test, web};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};

use wa_api::app::create_app;
use wa_api::middleware::auth::REFRESHED_TOKEN_HEADER;
use wa_api::routes::{health::StoreHealth, AppState};
use wa_core::domain::entities::user::User;
use wa_core::repositories::{MockTokenRepository, MockUserRepository};
use wa_core::services::token::{ManualClock, TokenService, TokenServiceConfig};
use wa_infra::PoolStatistics;

struct FlagHealth(AtomicBool);

#[async_trait]
impl StoreHealth for FlagHealth {
    async fn is_healthy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn pool_statistics(&self) -> Option<PoolStatistics> {
        Some(PoolStatistics {
            connections: 4,
            idle_connections: 3,
            max_connections: 10,
        })
    }
}

struct Harness {
    state: web::Data<AppState<MockUserRepository, MockTokenRepository>>,
    users: Arc<MockUserRepository>,
    tokens: Arc<MockTokenRepository>,
    clock: Arc<ManualClock>,
    health: Arc<FlagHealth>,
    alice: User,
}

async fn harness() -> Harness {
    let users = Arc::new(MockUserRepository::new());
    let tokens = Arc::new(MockTokenRepository::new());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    ));
    let health = Arc::new(FlagHealth(AtomicBool::new(true)));

    let token_service = Arc::new(
        TokenService::with_clock(
            tokens.clone(),
            TokenServiceConfig {
                jwt_secret: "api-test-secret".to_string(),
                ..TokenServiceConfig::default()
            },
            clock.clone(),
        )
        .unwrap(),
    );

    let alice = User::new("alice", "alice@example.com");
    users.add_user(alice.clone(), "correct horse").await;

    let state = web::Data::new(AppState::new(users.clone(), token_service, health.clone()));

    Harness {
        state,
        users,
        tokens,
        clock,
        health,
        alice,
    }
}

fn login_request(email: &str, password: &str) -> actix_web::test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }))
}

fn session_request(token: &str) -> actix_web::test::TestRequest {
    test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(("Authorization", format!("Bearer {}", token)))
}

#[actix_web::test]
async fn test_health_reports_store_state() {
    let h = harness().await;
    let app = test::init_service(create_app(h.state.clone())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["database"], "up");
    assert_eq!(body["pool"]["connections"], 4);
    assert_eq!(body["pool"]["idle_connections"], 3);
    assert_eq!(body["pool"]["max_connections"], 10);

    h.health.0.store(false, Ordering::SeqCst);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_login_and_session() {
    let h = harness().await;
    let app = test::init_service(create_app(h.state.clone())).await;

    let req = login_request("alice@example.com", "correct horse").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 900);
    assert_eq!(body["user"]["email"], "alice@example.com");
    let token = body["access_token"].as_str().unwrap().to_string();

    let resp = test::call_service(&app, session_request(&token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(REFRESHED_TOKEN_HEADER).is_none());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], h.alice.id.to_string());
    assert_eq!(body["refreshed"], false);
}

#[actix_web::test]
async fn test_login_failures() {
    let h = harness().await;
    let app = test::init_service(create_app(h.state.clone())).await;

    let req = login_request("alice@example.com", "wrong").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = test::read_body_json(resp).await;

    let req = login_request("nobody@example.com", "wrong").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: Value = test::read_body_json(resp).await;
    assert_eq!(wrong_password["error"], "INVALID_CREDENTIALS");
    assert_eq!(wrong_password["message"], unknown_user["message"]);

    let resp = test::call_service(&app, login_request("not-an-email", "x").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    h.users.set_active(h.alice.id, false).await;
    let req = login_request("alice@example.com", "correct horse").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_protected_routes_reject_missing_or_bad_tokens() {
    let h = harness().await;
    let app = test::init_service(create_app(h.state.clone())).await;

    let req = test::TestRequest::get().uri("/api/v1/session").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(("Authorization", "Token abc"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(&app, session_request("garbage").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_INVALID");
}

#[actix_web::test]
async fn test_expired_and_invalid_tokens_share_a_response() {
    let h = harness().await;
    let app = test::init_service(create_app(h.state.clone())).await;

    let issued = h.state.token_service.issue(&h.alice.principal()).await.unwrap();
    h.clock.advance(Duration::minutes(16));

    let resp = test::call_service(&app, session_request(&issued.token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let expired: Value = test::read_body_json(resp).await;

    let resp = test::call_service(&app, session_request("a.b.c").to_request()).await;
    let invalid: Value = test::read_body_json(resp).await;

    assert_eq!(expired["error"], invalid["error"]);
    assert_eq!(expired["message"], invalid["message"]);
}

#[actix_web::test]
async fn test_refreshed_token_is_returned_in_header() {
    let h = harness().await;
    let app = test::init_service(create_app(h.state.clone())).await;

    let issued = h.state.token_service.issue(&h.alice.principal()).await.unwrap();
    h.clock.advance(Duration::minutes(11));

    let resp = test::call_service(&app, session_request(&issued.token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let refreshed = resp
        .headers()
        .get(REFRESHED_TOKEN_HEADER)
        .expect("refreshed token header")
        .to_str()
        .unwrap()
        .to_string();
    assert_ne!(refreshed, issued.token);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["refreshed"], true);

    let resp = test::call_service(&app, session_request(&issued.token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(&app, session_request(&refreshed).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(REFRESHED_TOKEN_HEADER).is_none());
}

#[actix_web::test]
async fn test_store_outage_is_service_unavailable() {
    let h = harness().await;
    let app = test::init_service(create_app(h.state.clone())).await;

    let issued = h.state.token_service.issue(&h.alice.principal()).await.unwrap();
    h.tokens.set_unavailable(true);

    let resp = test::call_service(&app, session_request(&issued.token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "SERVICE_UNAVAILABLE");
}

#[actix_web::test]
async fn test_logout_revokes_session() {
    let h = harness().await;
    let app = test::init_service(create_app(h.state.clone())).await;

    let issued = h.state.token_service.issue(&h.alice.principal()).await.unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(("Authorization", format!("Bearer {}", issued.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["revoked"], 1);

    let resp = test::call_service(&app, session_request(&issued.token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(h.tokens.count_active_for_user(h.alice.id).await, 0);
}

#[actix_web::test]
async fn test_logout_all_sessions() {
    let h = harness().await;
    let app = test::init_service(create_app(h.state.clone())).await;

    let issued = h.state.token_service.issue(&h.alice.principal()).await.unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout?all=true")
        .insert_header(("Authorization", format!("Bearer {}", issued.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(h.tokens.count_active_for_user(h.alice.id).await, 0);
}

#[actix_web::test]
async fn test_unknown_route_is_not_found() {
    let h = harness().await;
    let app = test::init_service(create_app(h.state.clone())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/nope").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
