//! Business services containing domain logic and use cases.

pub mod auth;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, LoginResult};
pub use token::{
    AuthenticatedSession, Clock, ManualClock, SessionAuthenticator, SystemClock, TokenIssuer,
    TokenReaper, TokenRefresher, TokenService, TokenServiceConfig, TokenValidator,
    ValidatedSession,
};
