use axum::{extract::rejection::JsonRejection, extract::Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MessageResponse;
use crate::common::{ApiError, ApiResult};
use crate::domains::auth::actions::{request_otp, verify_otp};
use crate::domains::auth::Role;
use crate::server::app::AxumAppState;

#[derive(Debug, Default, Deserialize)]
pub struct RequestOtpBody {
    #[serde(default)]
    pub email: Option<String>,
}

/// Fields arrive untyped so a value of the wrong JSON type is reported
/// against that field instead of discarding the whole body.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyOtpBody {
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub otp: Option<Value>,
    #[serde(default)]
    pub role: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub role: Role,
    pub verified: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub token: String,
    pub user: UserResponse,
}

/// POST /request-otp
pub async fn request_otp_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<RequestOtpBody>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let body = payload.map(|Json(body)| body).unwrap_or_default();
    let email = body.email.unwrap_or_default();
    if email.trim().is_empty() {
        return Err(ApiError::EmailRequired);
    }

    request_otp(&email, &state.deps).await?;

    Ok(Json(MessageResponse { message: "otp_sent" }))
}

/// POST /verify-otp
pub async fn verify_otp_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<VerifyOtpBody>, JsonRejection>,
) -> ApiResult<Json<VerifyOtpResponse>> {
    let body = payload.map(|Json(body)| body).unwrap_or_default();
    let (Some(Value::String(email)), Some(otp)) = (body.email, body.otp) else {
        return Err(ApiError::EmailAndOtpRequired);
    };

    // Codes are compared as strings; a number can never match one
    let otp = match otp {
        Value::String(otp) => otp,
        Value::Null => return Err(ApiError::EmailAndOtpRequired),
        _ => return Err(ApiError::InvalidOtp),
    };

    let role = match body.role {
        None | Some(Value::Null) => None,
        Some(Value::String(role)) => Some(role),
        Some(_) => return Err(ApiError::InvalidRole),
    };

    let login = verify_otp(&email, &otp, role.as_deref(), &state.deps).await?;

    Ok(Json(VerifyOtpResponse {
        token: login.token,
        user: UserResponse {
            email: login.user.email,
            role: login.user.role,
            verified: login.user.verified,
        },
    }))
}
