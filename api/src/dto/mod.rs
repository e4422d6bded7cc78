pub mod auth;

pub use wa_shared::ErrorResponse;
