use tracing::info;

use crate::common::{Actor, ApiError, AuthUser, Capability};
use crate::domains::auth::email::normalize_email;
use crate::domains::permissions::PermissionGrant;
use crate::kernel::ServerDeps;

/// Let `viewer_email` read the calling sharer's location.
///
/// The viewer does not need to exist yet; the grant applies once they sign up.
pub async fn grant_permission(
    actor: &AuthUser,
    viewer_email: Option<&str>,
    deps: &ServerDeps,
) -> Result<PermissionGrant, ApiError> {
    Actor::from_user(actor)
        .can(Capability::GrantPermission)
        .check()?;

    let viewer_email = viewer_email.map(normalize_email).unwrap_or_default();
    if viewer_email.is_empty() {
        return Err(ApiError::ViewerEmailRequired);
    }

    let grant = deps.permissions.grant(&actor.email, &viewer_email).await?;

    info!(sharer = %actor.email, viewer = %viewer_email, "Permission granted");
    Ok(grant)
}
