use tracing::debug;

use crate::common::{Actor, ApiError, AuthUser, Capability};
use crate::domains::auth::email::normalize_email;
use crate::domains::locations::Location;
use crate::kernel::ServerDeps;

/// Latest position of `sharer_email`, if the calling viewer holds a grant.
///
/// The permission check runs before the lookup so a viewer without a grant
/// cannot tell whether the sharer has ever posted.
pub async fn get_location(
    actor: &AuthUser,
    sharer_email: &str,
    deps: &ServerDeps,
) -> Result<Location, ApiError> {
    Actor::from_user(actor)
        .can(Capability::FetchLocation)
        .check()?;

    let sharer_email = normalize_email(sharer_email);

    if !deps.permissions.is_granted(&actor.email, &sharer_email).await? {
        debug!(viewer = %actor.email, sharer = %sharer_email, "No permission");
        return Err(ApiError::NoPermission);
    }

    deps.locations
        .latest(&sharer_email)
        .await?
        .ok_or(ApiError::NoLocationFound)
}
