/// Authentication and authorization helpers
///
/// Requests arrive with an optional bearer token which `authenticate` turns
/// into an `Authentication`. Handlers then demand a user and check role
/// capabilities with the fluent `Actor` API:
///
/// ```ignore
/// let user = auth.require()?;
/// Actor::from_user(user)
///     .can(Capability::PostLocation)
///     .check()?;
/// ```
mod bearer;
mod builder;
mod capability;

pub use bearer::{authenticate, Authentication, AuthUser};
pub use builder::{Actor, CapabilityBuilder};
pub use capability::Capability;
