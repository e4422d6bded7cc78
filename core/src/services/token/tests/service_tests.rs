//! Lifecycle tests for the token service facade

use std::sync::Arc;

use chrono::Duration;

use super::{fixture, fixture_with, principal, start_time, test_config};
use crate::errors::{DomainError, TokenError};
use crate::repositories::MockTokenRepository;
use crate::services::token::{SessionAuthenticator, TokenService, TokenServiceConfig};

#[tokio::test]
async fn test_session_lifecycle_with_refresh() {
    let f = fixture();
    let alice = principal("alice@example.com");
    let original = f.service.issue(&alice).await.unwrap();

    // Fresh token: accepted as is
    let session = f.service.authenticate(&original.token).await.unwrap();
    assert_eq!(session.principal, alice);
    assert!(!session.refreshed);
    assert_eq!(session.token, original.token);

    // Eleven minutes in: inside the renewal window
    f.clock.advance(Duration::minutes(11));
    let session = f.service.authenticate(&original.token).await.unwrap();
    assert!(session.refreshed);
    assert_ne!(session.token, original.token);
    assert_eq!(session.expires_at, start_time() + Duration::minutes(26));

    assert_eq!(
        f.service.validate(&original.token).await,
        Err(DomainError::Token(TokenError::Invalid))
    );
    let replacement = session.token;
    assert_eq!(f.service.validate(&replacement).await.unwrap(), alice);

    // Sixteen minutes in: the original is past its embedded expiry
    f.clock.advance(Duration::minutes(5));
    assert_eq!(
        f.service.authenticate(&original.token).await,
        Err(DomainError::Token(TokenError::Expired))
    );
    let session = f.service.authenticate(&replacement).await.unwrap();
    assert!(!session.refreshed);
}

#[tokio::test]
async fn test_authenticate_reports_store_outage() {
    let f = fixture();
    let issued = f.service.issue(&principal("alice@example.com")).await.unwrap();
    f.repo.set_unavailable(true);

    let err = f.service.authenticate(&issued.token).await.unwrap_err();

    assert!(err.is_persistence());
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let f = fixture();
    let issued = f.service.issue(&principal("alice@example.com")).await.unwrap();

    assert!(f.service.revoke(&issued.token).await.unwrap());
    assert!(!f.service.revoke(&issued.token).await.unwrap());
    assert!(!f.service.revoke("never-issued").await.unwrap());

    assert_eq!(
        f.service.authenticate(&issued.token).await,
        Err(DomainError::Token(TokenError::Invalid))
    );
}

#[tokio::test]
async fn test_revoke_all_sessions() {
    let f = fixture_with(TokenServiceConfig {
        single_active: false,
        ..test_config()
    });
    let alice = principal("alice@example.com");
    let bob = principal("bob@example.com");
    f.service.issue(&alice).await.unwrap();
    f.service.issue(&alice).await.unwrap();
    let bobs = f.service.issue(&bob).await.unwrap();

    assert_eq!(f.service.revoke_all(alice.user_id).await.unwrap(), 2);

    assert!(f.service.active_session(alice.user_id).await.unwrap().is_none());
    assert_eq!(f.service.validate(&bobs.token).await.unwrap(), bob);
}

#[tokio::test]
async fn test_active_session_ignores_expired_records() {
    let f = fixture();
    let alice = principal("alice@example.com");
    let issued = f.service.issue(&alice).await.unwrap();

    let active = f.service.active_session(alice.user_id).await.unwrap().unwrap();
    assert_eq!(active.id, issued.record_id);

    f.clock.advance(Duration::minutes(15));
    assert!(f.service.active_session(alice.user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_single_session_login_invalidates_other_device() {
    let f = fixture();
    let alice = principal("alice@example.com");

    let laptop = f.service.issue(&alice).await.unwrap();
    f.clock.advance(Duration::seconds(30));
    let phone = f.service.issue(&alice).await.unwrap();

    assert_eq!(
        f.service.authenticate(&laptop.token).await,
        Err(DomainError::Token(TokenError::Invalid))
    );
    assert!(f.service.authenticate(&phone.token).await.is_ok());
}

#[test]
fn test_renewal_window_must_be_shorter_than_ttl() {
    let result = TokenService::new(
        Arc::new(MockTokenRepository::new()),
        TokenServiceConfig {
            renewal_window: Duration::minutes(15),
            ..test_config()
        },
    );

    assert!(matches!(result, Err(DomainError::Configuration { .. })));
}

#[tokio::test]
async fn test_usable_as_trait_object() {
    let f = fixture();
    let alice = principal("alice@example.com");
    let issued = f.service.issue(&alice).await.unwrap();

    let authenticator: Arc<dyn SessionAuthenticator> = Arc::new(f.service);

    let session = authenticator.authenticate(&issued.token).await.unwrap();
    assert_eq!(session.principal, alice);
    assert!(authenticator.revoke(&session.token).await.unwrap());
}
