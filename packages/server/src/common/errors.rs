use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Failures surfaced to API callers.
///
/// Every variant carries a stable machine-readable reason code; the client
/// is responsible for turning it into human-readable text.
#[derive(Error, Debug)]
pub enum ApiError {
    // Input
    #[error("Email is required")]
    EmailRequired,

    #[error("Email address is malformed")]
    InvalidEmailFormat,

    #[error("Email domain has no mail exchanger")]
    InvalidEmailDomain,

    #[error("Email and OTP are required")]
    EmailAndOtpRequired,

    #[error("No OTP requested for this email")]
    NoOtpRequested,

    #[error("OTP expired")]
    OtpExpired,

    #[error("Role must be 'sharer' or 'viewer'")]
    InvalidRole,

    #[error("Latitude and longitude are required")]
    LatAndLngRequired,

    #[error("Viewer email is required")]
    ViewerEmailRequired,

    // Authentication
    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("Authentication token missing")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    // Authorization
    #[error("Only sharers can post locations")]
    OnlySharersCanPost,

    #[error("Only viewers can fetch locations")]
    OnlyViewersCanFetch,

    #[error("Only sharers can grant permissions")]
    OnlySharersCanGrant,

    #[error("No permission to view this location")]
    NoPermission,

    // Not found
    #[error("No location found")]
    NoLocationFound,

    // Upstream
    #[error("Failed to send email")]
    EmailFailed,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmailRequired
            | Self::InvalidEmailFormat
            | Self::InvalidEmailDomain
            | Self::EmailAndOtpRequired
            | Self::NoOtpRequested
            | Self::OtpExpired
            | Self::InvalidRole
            | Self::LatAndLngRequired
            | Self::ViewerEmailRequired => StatusCode::BAD_REQUEST,
            Self::InvalidOtp | Self::MissingToken | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::OnlySharersCanPost
            | Self::OnlyViewersCanFetch
            | Self::OnlySharersCanGrant
            | Self::NoPermission => StatusCode::FORBIDDEN,
            Self::NoLocationFound => StatusCode::NOT_FOUND,
            Self::EmailFailed | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmailRequired => "email_required",
            Self::InvalidEmailFormat => "invalid_email_format",
            Self::InvalidEmailDomain => "invalid_email_domain",
            Self::EmailAndOtpRequired => "email_and_otp_required",
            Self::NoOtpRequested => "no_otp_requested",
            Self::OtpExpired => "otp_expired",
            Self::InvalidRole => "invalid_role",
            Self::LatAndLngRequired => "lat_and_lng_required",
            Self::ViewerEmailRequired => "viewer_email_required",
            Self::InvalidOtp => "invalid_otp",
            Self::MissingToken => "missing_token",
            Self::InvalidToken => "invalid_token",
            Self::OnlySharersCanPost => "only_sharers_can_post",
            Self::OnlyViewersCanFetch => "only_viewers_can_fetch",
            Self::OnlySharersCanGrant => "only_sharers_can_grant",
            Self::NoPermission => "no_permission",
            Self::NoLocationFound => "no_location_found",
            Self::EmailFailed => "email_failed",
            Self::Internal(_) => "internal_error",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(e) = &self {
            tracing::error!(error = ?e, "Internal API error");
        }

        (
            self.status_code(),
            Json(ErrorBody {
                error: self.reason(),
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
