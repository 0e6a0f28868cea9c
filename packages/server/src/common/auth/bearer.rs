//! Bearer token authentication
//!
//! Turns an `Authorization` header value into the caller's identity.
//! Tokens are stateless: nothing here touches a store.

use crate::common::ApiError;
use crate::domains::auth::{JwtService, Role};

/// Authenticated user extracted from a verified token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
    pub role: Role,
}

/// Outcome of inspecting a request's credentials
#[derive(Clone, Debug)]
pub enum Authentication {
    /// No `Authorization: Bearer <token>` header
    Missing,
    /// A bearer token was present but failed signature, issuer or expiry checks
    Invalid,
    Authenticated(AuthUser),
}

impl Authentication {
    /// Demand an authenticated user, mapping failures to their reason codes
    pub fn require(&self) -> Result<&AuthUser, ApiError> {
        match self {
            Authentication::Missing => Err(ApiError::MissingToken),
            Authentication::Invalid => Err(ApiError::InvalidToken),
            Authentication::Authenticated(user) => Ok(user),
        }
    }
}

/// Validate the raw `Authorization` header value.
pub fn authenticate(header: Option<&str>, jwt_service: &JwtService) -> Authentication {
    let Some(token) = header.and_then(bearer_token) else {
        return Authentication::Missing;
    };

    match jwt_service.verify_token(token) {
        Ok(claims) => Authentication::Authenticated(AuthUser {
            email: claims.email,
            role: claims.role,
        }),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            Authentication::Invalid
        }
    }
}

/// Extract the token from `Bearer <token>`; anything else is not a bearer credential
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
