use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::common::{ApiResult, Authentication};
use crate::domains::permissions::actions::{grant_permission, list_viewers};
use crate::server::app::AxumAppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantPermissionBody {
    #[serde(default)]
    pub viewer_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GrantPermissionResponse {
    pub ok: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ViewersResponse {
    pub viewers: Vec<String>,
}

/// POST /permissions/grant
pub async fn grant_permission_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(auth): Extension<Authentication>,
    payload: Result<Json<GrantPermissionBody>, JsonRejection>,
) -> ApiResult<Json<GrantPermissionResponse>> {
    let user = auth.require()?;
    let body = payload.map(|Json(body)| body).unwrap_or_default();

    grant_permission(user, body.viewer_email.as_deref(), &state.deps).await?;

    Ok(Json(GrantPermissionResponse {
        ok: true,
        message: "permission_granted",
    }))
}

/// GET /permissions
pub async fn list_viewers_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(auth): Extension<Authentication>,
) -> ApiResult<Json<ViewersResponse>> {
    let user = auth.require()?;

    let grants = list_viewers(user, &state.deps).await?;

    Ok(Json(ViewersResponse {
        viewers: grants.into_iter().map(|grant| grant.viewer_email).collect(),
    }))
}
