//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{
    Claims, IssuedToken, NewTokenRecord, Principal, SessionRank, TokenRecord, MAX_TOKEN_LENGTH,
};
pub use user::User;
