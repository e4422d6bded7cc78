//! Authentication service module
//!
//! Login and logout on top of the token service:
//! - Credential check through the user collaborator
//! - Session token issuance for the authenticated user
//! - Revocation of the current or of every session

mod service;


pub use service::{AuthService, LoginResult};
