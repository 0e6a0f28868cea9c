//! Auth domain - handles authentication via email OTP
//!
//! Responsibilities:
//! - Email shape and MX validation
//! - Passcode issuance, single-use verification and expiry
//! - User creation on first verification
//! - JWT session tokens

pub mod actions;
pub mod email;
pub mod jwt;
pub mod models;
pub mod otp;

pub use jwt::{Claims, JwtService};
pub use models::{OtpCode, Role, User};
