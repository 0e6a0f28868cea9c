//! Verify OTP action

use chrono::Utc;
use tracing::{debug, info};

use crate::common::ApiError;
use crate::domains::auth::email::normalize_email;
use crate::domains::auth::{Role, User};
use crate::kernel::ServerDeps;

/// Result of a successful verification
#[derive(Debug, Clone)]
pub struct VerifiedLogin {
    pub token: String,
    pub user: User,
}

/// Check a submitted passcode and log the user in.
///
/// Only the most recently issued unconsumed code for the email is
/// considered. On success that code is consumed, the user record is created
/// if needed (first verification picks the role; `requested_role` is ignored
/// for existing users) and a session token is minted from the stored record.
pub async fn verify_otp(
    email: &str,
    code: &str,
    requested_role: Option<&str>,
    deps: &ServerDeps,
) -> Result<VerifiedLogin, ApiError> {
    let email = normalize_email(email);
    if email.is_empty() || code.is_empty() {
        return Err(ApiError::EmailAndOtpRequired);
    }

    let requested_role = match requested_role.map(str::trim).filter(|r| !r.is_empty()) {
        Some(role) => role.parse::<Role>().map_err(|_| ApiError::InvalidRole)?,
        None => Role::Viewer,
    };

    let record = deps
        .otps
        .find_latest_unconsumed(&email)
        .await?
        .ok_or(ApiError::NoOtpRequested)?;

    if record.is_expired_at(Utc::now()) {
        debug!(email = %email, otp_id = record.id, "OTP expired");
        return Err(ApiError::OtpExpired);
    }

    if !record.matches(code) {
        debug!(email = %email, otp_id = record.id, "OTP mismatch");
        return Err(ApiError::InvalidOtp);
    }

    // Lost a race with a concurrent verification of the same code
    if !deps.otps.consume(record.id).await? {
        debug!(email = %email, otp_id = record.id, "OTP already consumed");
        return Err(ApiError::NoOtpRequested);
    }

    let (user, created) = deps.users.find_or_create(&email, requested_role).await?;
    if created {
        info!(email = %email, role = %user.role, "User created");
    } else if user.role != requested_role {
        debug!(
            email = %email,
            role = %user.role,
            requested = %requested_role,
            "Ignoring requested role for existing user"
        );
    }

    let token = deps.jwt_service.create_token(&user.email, user.role)?;

    info!(email = %email, role = %user.role, "OTP verified");
    Ok(VerifiedLogin { token, user })
}
