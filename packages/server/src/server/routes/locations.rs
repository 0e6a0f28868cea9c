use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MessageResponse;
use crate::common::{ApiResult, Authentication};
use crate::domains::locations::actions::{get_location, post_location};
use crate::server::app::AxumAppState;

/// Coordinates arrive untyped so that strings or nulls can be rejected
/// with a reason code instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct PostLocationBody {
    #[serde(default)]
    pub lat: Option<Value>,
    #[serde(default)]
    pub lng: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub email: String,
    pub lat: f64,
    pub lng: f64,
    pub updated_at: DateTime<Utc>,
}

/// POST /locations
pub async fn post_location_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(auth): Extension<Authentication>,
    payload: Result<Json<PostLocationBody>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let user = auth.require()?;
    let body = payload.map(|Json(body)| body).unwrap_or_default();

    post_location(
        user,
        body.lat.as_ref().and_then(Value::as_f64),
        body.lng.as_ref().and_then(Value::as_f64),
        &state.deps,
    )
    .await?;

    Ok(Json(MessageResponse {
        message: "location_saved",
    }))
}

/// GET /locations/:email
pub async fn get_location_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(auth): Extension<Authentication>,
    Path(email): Path<String>,
) -> ApiResult<Json<LocationResponse>> {
    let user = auth.require()?;

    let location = get_location(user, &email, &state.deps).await?;

    Ok(Json(LocationResponse {
        email: location.email,
        lat: location.latitude,
        lng: location.longitude,
        updated_at: location.recorded_at,
    }))
}
