//! Request OTP action

use chrono::{Duration, Utc};
use tracing::{error, info, warn};

use crate::common::ApiError;
use crate::domains::auth::email::{normalize_email, validate_email};
use crate::domains::auth::otp::{generate_code, OTP_LENGTH};
use crate::kernel::ServerDeps;

/// Issue a passcode for `email` and mail it.
///
/// The address is validated first; a rejected address gets no record and no
/// mail. The record is written before delivery, so when the mailer fails the
/// code stays in the store and remains usable. The caller is told
/// `email_failed` and a retry issues a fresh code.
pub async fn request_otp(email: &str, deps: &ServerDeps) -> Result<(), ApiError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(ApiError::EmailRequired);
    }

    validate_email(&email, deps.mx_resolver.as_ref(), deps.upstream_timeout).await?;

    let code = generate_code(OTP_LENGTH);
    let expires_at = Utc::now() + deps.otp_ttl;
    let record = deps.otps.create(&email, &code, expires_at).await?;

    info!(email = %email, otp_id = record.id, expires_at = %expires_at, "OTP issued");

    let subject = "Your login code";
    let body = format!(
        "Your login code is {}\n\nIt expires in {}.",
        code,
        lifetime_phrase(deps.otp_ttl)
    );

    match tokio::time::timeout(
        deps.upstream_timeout,
        deps.mailer.send(&email, subject, &body),
    )
    .await
    {
        Ok(Ok(())) => {
            info!(email = %email, "OTP email sent");
            Ok(())
        }
        Ok(Err(e)) => {
            error!(email = %email, error = %e, "Failed to send OTP email");
            Err(ApiError::EmailFailed)
        }
        Err(_) => {
            warn!(email = %email, "OTP email delivery timed out");
            Err(ApiError::EmailFailed)
        }
    }
}

/// Human wording for a code lifetime; sub-minute TTLs are given in seconds
fn lifetime_phrase(ttl: Duration) -> String {
    let minutes = ttl.num_minutes();
    if minutes >= 1 {
        return match minutes {
            1 => "1 minute".to_string(),
            n => format!("{} minutes", n),
        };
    }

    match ttl.num_seconds().max(0) {
        1 => "1 second".to_string(),
        n => format!("{} seconds", n),
    }
}
