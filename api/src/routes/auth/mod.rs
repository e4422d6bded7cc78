//! Authentication route handlers
//!
//! - Login with email and password
//! - Logout of the current or of every session

pub mod login;
pub mod logout;
