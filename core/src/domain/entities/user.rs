//! User entity as seen by the session subsystem.
//!
//! Account storage lives with the user collaborator; this is the read model
//! needed to authenticate and to issue tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::token::Principal;

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Display name
    pub username: String,

    /// Login identifier, also the token subject
    pub email: String,

    /// Deactivated accounts cannot log in
    pub is_active: bool,
}

impl User {
    /// Creates a new active user
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            is_active: true,
        }
    }

    /// The principal a session token for this user represents
    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.email.clone())
    }
}
