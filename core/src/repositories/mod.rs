//! Repository interfaces for token and user persistence.

mod deadline;
pub mod token;
pub mod user;

pub use token::{MockTokenRepository, TimedTokenRepository, TokenRepository};
pub use user::{MockUserRepository, TimedUserRepository, UserRepository};
