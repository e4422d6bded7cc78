//! User collaborator module.

mod r#trait;
pub use r#trait::UserRepository;

mod timed;
pub use timed::TimedUserRepository;

mod mock;
pub use mock::MockUserRepository;
