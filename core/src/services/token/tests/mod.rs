mod service_tests;

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::entities::token::Principal;
use crate::repositories::MockTokenRepository;
use crate::services::token::{ManualClock, TokenService, TokenServiceConfig};

pub(super) fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub(super) fn test_config() -> TokenServiceConfig {
    TokenServiceConfig {
        jwt_secret: "test-secret-key".to_string(),
        issuer: "wallet-auth".to_string(),
        token_ttl: Duration::minutes(15),
        renewal_window: Duration::minutes(5),
        single_active: true,
    }
}

pub(super) fn principal(email: &str) -> Principal {
    Principal::new(Uuid::new_v4(), email)
}

pub(super) struct Fixture {
    pub repo: Arc<MockTokenRepository>,
    pub clock: Arc<ManualClock>,
    pub service: TokenService<MockTokenRepository>,
}

pub(super) fn fixture() -> Fixture {
    fixture_with(test_config())
}

pub(super) fn fixture_with(config: TokenServiceConfig) -> Fixture {
    let repo = Arc::new(MockTokenRepository::new());
    let clock = Arc::new(ManualClock::new(start_time()));
    let service = TokenService::with_clock(repo.clone(), config, clock.clone()).unwrap();

    Fixture {
        repo,
        clock,
        service,
    }
}
