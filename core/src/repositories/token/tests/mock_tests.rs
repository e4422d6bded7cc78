//! Unit tests for mock token repository implementation

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::entities::token::NewTokenRecord;
use crate::errors::DomainError;
use crate::repositories::token::{MockTokenRepository, TokenRepository};

fn new_record(user_id: Uuid, token: &str, minutes: i64) -> NewTokenRecord {
    NewTokenRecord {
        user_id,
        token: token.to_string(),
        expires_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes),
    }
}

#[tokio::test]
async fn test_insert_and_find_by_token() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();

    let id = repo.insert(new_record(user_id, "token-a", 15)).await.unwrap();

    let found = repo.find_active_by_token("token-a").await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.user_id, user_id);
    assert!(found.is_active);

    assert!(repo.find_active_by_token("token-b").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_active_token_rejected() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();

    repo.insert(new_record(user_id, "same", 15)).await.unwrap();
    let result = repo.insert(new_record(user_id, "same", 15)).await;

    assert!(matches!(result, Err(DomainError::Persistence { .. })));
}

#[tokio::test]
async fn test_deactivate_is_idempotent() {
    let repo = MockTokenRepository::new();
    let id = repo
        .insert(new_record(Uuid::new_v4(), "token", 15))
        .await
        .unwrap();

    assert!(repo.deactivate(id).await.unwrap());
    let after_first = repo.get(id).await.unwrap();

    assert!(!repo.deactivate(id).await.unwrap());
    let after_second = repo.get(id).await.unwrap();

    assert_eq!(after_first, after_second);
    assert!(!after_second.is_active);
    assert!(repo.find_active_by_token("token").await.unwrap().is_none());
}

#[tokio::test]
async fn test_deactivate_unknown_id() {
    let repo = MockTokenRepository::new();
    assert!(!repo.deactivate(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_find_active_by_user_returns_latest() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();

    repo.insert(new_record(user_id, "older", 10)).await.unwrap();
    let newer = repo.insert(new_record(user_id, "newer", 15)).await.unwrap();
    repo.insert(new_record(Uuid::new_v4(), "someone-else", 20))
        .await
        .unwrap();

    let found = repo.find_active_by_user(user_id).await.unwrap().unwrap();
    assert_eq!(found.id, newer);

    repo.deactivate(newer).await.unwrap();
    let found = repo.find_active_by_user(user_id).await.unwrap().unwrap();
    assert_eq!(found.token, "older");
}

#[tokio::test]
async fn test_deactivate_all_expired_boundary() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();
    let cutoff = Utc.with_ymd_and_hms(2024, 5, 1, 12, 10, 0).unwrap();

    let past = repo.insert(new_record(user_id, "past", 5)).await.unwrap();
    let exact = repo.insert(new_record(user_id, "exact", 10)).await.unwrap();
    let future = repo.insert(new_record(user_id, "future", 15)).await.unwrap();

    let count = repo.deactivate_all_expired(cutoff).await.unwrap();

    assert_eq!(count, 2);
    assert!(!repo.get(past).await.unwrap().is_active);
    assert!(!repo.get(exact).await.unwrap().is_active);
    assert!(repo.get(future).await.unwrap().is_active);

    // Already inactive records are not counted again
    assert_eq!(repo.deactivate_all_expired(cutoff).await.unwrap(), 0);
}

#[tokio::test]
async fn test_deactivate_all_for_user_spares_newer_records() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();
    let other_user = Uuid::new_v4();

    repo.insert(new_record(user_id, "a", 5)).await.unwrap();
    repo.insert(new_record(user_id, "b", 10)).await.unwrap();
    let keep = repo.insert(new_record(user_id, "c", 15)).await.unwrap();
    repo.insert(new_record(other_user, "d", 1)).await.unwrap();

    let keep_rank = repo.get(keep).await.unwrap().rank();
    let count = repo
        .deactivate_all_for_user(user_id, Some(keep_rank))
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(repo.count_active_for_user(user_id).await, 1);
    assert!(repo.get(keep).await.unwrap().is_active);
    assert_eq!(repo.count_active_for_user(other_user).await, 1);
}

#[tokio::test]
async fn test_deactivate_all_for_user_breaks_same_second_ties_by_id() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();

    let first = repo.insert(new_record(user_id, "a", 15)).await.unwrap();
    let second = repo.insert(new_record(user_id, "b", 15)).await.unwrap();
    let second_rank = repo.get(second).await.unwrap().rank();
    let first_rank = repo.get(first).await.unwrap().rank();

    // The earlier insert never outranks the later one
    assert_eq!(
        repo.deactivate_all_for_user(user_id, Some(first_rank))
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        repo.deactivate_all_for_user(user_id, Some(second_rank))
            .await
            .unwrap(),
        1
    );
    assert!(!repo.get(first).await.unwrap().is_active);
    assert!(repo.get(second).await.unwrap().is_active);

    let latest = repo.find_active_by_user(user_id).await.unwrap().unwrap();
    assert_eq!(latest.id, second);
}

#[tokio::test]
async fn test_deactivate_all_for_user_without_bound() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();

    repo.insert(new_record(user_id, "a", 5)).await.unwrap();
    repo.insert(new_record(user_id, "b", 15)).await.unwrap();

    assert_eq!(repo.deactivate_all_for_user(user_id, None).await.unwrap(), 2);
    assert_eq!(repo.count_active_for_user(user_id).await, 0);
}

#[tokio::test]
async fn test_unavailable_store() {
    let repo = MockTokenRepository::new();
    repo.set_unavailable(true);

    let result = repo.find_active_by_token("anything").await;
    assert!(matches!(result, Err(DomainError::Persistence { .. })));

    repo.set_unavailable(false);
    assert!(repo.find_active_by_token("anything").await.unwrap().is_none());
}
