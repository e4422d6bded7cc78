//! Token entities for session authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest signed token the `tokens.token` column holds
pub const MAX_TOKEN_LENGTH: usize = 2048;

/// Authenticated identity a session token represents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Owning user's ID
    pub user_id: Uuid,

    /// Principal identifier carried in the token subject (the user's email)
    pub subject: String,
}

impl Principal {
    pub fn new(user_id: Uuid, subject: impl Into<String>) -> Self {
        Self {
            user_id,
            subject: subject.into(),
        }
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal identifier)
    pub sub: String,

    /// Owning user ID
    pub uid: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp, equal to the store record's `expires_at`
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID, keeps two tokens issued in the same second distinct
    pub jti: String,
}

impl Claims {
    /// Creates claims for a principal
    ///
    /// # Arguments
    ///
    /// * `principal` - The principal the token is issued to
    /// * `issued_at` - Issue instant
    /// * `expires_at` - Expiry instant (whole seconds)
    /// * `issuer` - Issuer claim
    pub fn new(
        principal: &Principal,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        issuer: &str,
    ) -> Self {
        Self {
            sub: principal.subject.clone(),
            uid: principal.user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    ///
    /// # Returns
    ///
    /// `Ok(Uuid)` if the uid claim can be parsed as a UUID, `Err` otherwise
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.uid)
    }

    /// Rebuilds the principal carried by these claims
    pub fn principal(&self) -> Result<Principal, uuid::Error> {
        Ok(Principal::new(self.user_id()?, self.sub.clone()))
    }
}

/// Persisted state backing a signed session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Store-assigned identifier
    pub id: Uuid,

    /// User this token belongs to
    pub user_id: Uuid,

    /// The exact signed token handed to the client
    pub token: String,

    /// Instant after which the record is logically dead
    pub expires_at: DateTime<Utc>,

    /// Cleared on refresh, revocation or reaping; never set again
    pub is_active: bool,
}

impl TokenRecord {
    /// Checks if the record has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Checks if the record would pass validation at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }

    /// Marks the record inactive
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Position of this record among its user's sessions
    pub fn rank(&self) -> SessionRank {
        SessionRank {
            expires_at: self.expires_at,
            id: self.id,
        }
    }

    /// Time left before expiry, zero once expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

/// Issuance order of a user's sessions
///
/// Later expiry ranks higher. Records expiring in the same second are ordered
/// by their time-ordered (v7) record ID, so two sessions never tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionRank {
    pub expires_at: DateTime<Utc>,
    pub id: Uuid,
}

/// Token record before the store assigns it an ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTokenRecord {
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl NewTokenRecord {
    /// Attach the store-assigned ID; new records always start active
    pub fn into_record(self, id: Uuid) -> TokenRecord {
        TokenRecord {
            id,
            user_id: self.user_id,
            token: self.token,
            expires_at: self.expires_at,
            is_active: true,
        }
    }
}

/// Token returned to the caller after a successful issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    /// ID of the backing record
    pub record_id: Uuid,

    /// Signed token string
    pub token: String,

    /// Expiry instant
    pub expires_at: DateTime<Utc>,
}
