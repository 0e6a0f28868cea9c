//! Email address validation
//!
//! Two gates run before any passcode is issued: the address must look like
//! `local@domain.tld`, and the domain must publish at least one MX record.

use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, warn};

use crate::common::ApiError;
use crate::kernel::BaseMxResolver;

lazy_static! {
    // local@domain with at least one dot in the domain, no whitespace
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Lower-case and trim so one mailbox maps to one identity
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_format(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Domain part of an address that already passed `is_valid_format`
fn domain_of(email: &str) -> Option<&str> {
    email.rsplit_once('@').map(|(_, domain)| domain)
}

/// Check shape, then MX records.
///
/// Resolver errors and timeouts count as "no MX records" so a flaky DNS
/// server can never let an unchecked address through.
pub async fn validate_email(
    email: &str,
    resolver: &dyn BaseMxResolver,
    timeout: Duration,
) -> Result<(), ApiError> {
    if !is_valid_format(email) {
        debug!(email = %email, "Rejected malformed email");
        return Err(ApiError::InvalidEmailFormat);
    }

    let domain = domain_of(email).ok_or(ApiError::InvalidEmailFormat)?;

    let has_mx = match tokio::time::timeout(timeout, resolver.has_mx_records(domain)).await {
        Ok(Ok(found)) => found,
        Ok(Err(e)) => {
            warn!(domain = %domain, error = %e, "MX lookup failed");
            false
        }
        Err(_) => {
            warn!(domain = %domain, timeout_secs = timeout.as_secs_f64(), "MX lookup timed out");
            false
        }
    };

    if !has_mx {
        debug!(domain = %domain, "Rejected email domain without MX records");
        return Err(ApiError::InvalidEmailDomain);
    }

    Ok(())
}
