use super::{AuthUser, Capability};
use crate::common::ApiError;
use crate::domains::auth::Role;
use tracing::debug;

/// Entry point for role checks
///
/// Usage:
/// ```ignore
/// Actor::new(&user.email, user.role)
///     .can(Capability::GrantPermission)
///     .check()?;
/// ```
pub struct Actor<'a> {
    email: &'a str,
    role: Role,
}

impl<'a> Actor<'a> {
    pub fn new(email: &'a str, role: Role) -> Self {
        Self { email, role }
    }

    pub fn from_user(user: &'a AuthUser) -> Self {
        Self::new(&user.email, user.role)
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: Capability) -> CapabilityBuilder<'a> {
        CapabilityBuilder {
            email: self.email,
            role: self.role,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder<'a> {
    email: &'a str,
    role: Role,
    capability: Capability,
}

impl CapabilityBuilder<'_> {
    /// Perform the authorization check
    ///
    /// The role comes from a verified token, which was minted from the
    /// stored user record at OTP verification time.
    pub fn check(self) -> Result<(), ApiError> {
        if self.role != self.capability.required_role() {
            debug!(
                email = %self.email,
                role = %self.role,
                capability = ?self.capability,
                "Capability denied"
            );
            return Err(self.capability.denied());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sharer_can_post_and_grant() {
        assert!(Actor::new("s@x.com", Role::Sharer)
            .can(Capability::PostLocation)
            .check()
            .is_ok());
        assert!(Actor::new("s@x.com", Role::Sharer)
            .can(Capability::GrantPermission)
            .check()
            .is_ok());
    }

    #[test]
    fn test_sharer_cannot_fetch() {
        let result = Actor::new("s@x.com", Role::Sharer)
            .can(Capability::FetchLocation)
            .check();
        assert!(matches!(result, Err(ApiError::OnlyViewersCanFetch)));
    }

    #[test]
    fn test_viewer_denials_are_specific() {
        let post = Actor::new("v@y.com", Role::Viewer)
            .can(Capability::PostLocation)
            .check();
        assert!(matches!(post, Err(ApiError::OnlySharersCanPost)));

        let grant = Actor::new("v@y.com", Role::Viewer)
            .can(Capability::GrantPermission)
            .check();
        assert!(matches!(grant, Err(ApiError::OnlySharersCanGrant)));

        assert!(Actor::new("v@y.com", Role::Viewer)
            .can(Capability::FetchLocation)
            .check()
            .is_ok());
    }
}
