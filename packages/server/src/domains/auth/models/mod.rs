mod otp_code;
mod user;

pub use otp_code::OtpCode;
pub use user::{Role, User};
