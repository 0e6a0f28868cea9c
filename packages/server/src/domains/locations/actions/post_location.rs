use tracing::info;

use crate::common::{Actor, ApiError, AuthUser, Capability};
use crate::domains::locations::Location;
use crate::kernel::ServerDeps;

/// Append a new position for the calling sharer.
///
/// Coordinates must be present and finite. Range is not checked, so a
/// latitude of 120 is stored as given.
pub async fn post_location(
    actor: &AuthUser,
    latitude: Option<f64>,
    longitude: Option<f64>,
    deps: &ServerDeps,
) -> Result<Location, ApiError> {
    Actor::from_user(actor)
        .can(Capability::PostLocation)
        .check()?;

    let (latitude, longitude) = match (latitude, longitude) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => (lat, lng),
        _ => return Err(ApiError::LatAndLngRequired),
    };

    let location = deps.locations.record(&actor.email, latitude, longitude).await?;

    info!(email = %actor.email, location_id = location.id, "Location saved");
    Ok(location)
}
