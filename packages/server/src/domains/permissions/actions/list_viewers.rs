use crate::common::{Actor, ApiError, AuthUser, Capability};
use crate::domains::permissions::PermissionGrant;
use crate::kernel::ServerDeps;

/// Grants the calling sharer has handed out
pub async fn list_viewers(
    actor: &AuthUser,
    deps: &ServerDeps,
) -> Result<Vec<PermissionGrant>, ApiError> {
    Actor::from_user(actor)
        .can(Capability::GrantPermission)
        .check()?;

    Ok(deps.permissions.viewers_of(&actor.email).await?)
}
