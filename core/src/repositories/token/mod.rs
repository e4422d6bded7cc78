//! Token store module.

mod r#trait;
pub use r#trait::TokenRepository;

mod timed;
pub use timed::TimedTokenRepository;

mod mock;
pub use mock::MockTokenRepository;

#[cfg(test)]
mod tests;
