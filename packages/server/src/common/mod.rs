// Common types and utilities shared across the application

pub mod auth;
pub mod errors;

pub use auth::{authenticate, Actor, Authentication, AuthUser, Capability};
pub use errors::{ApiError, ApiResult};
