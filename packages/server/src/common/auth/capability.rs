use crate::common::ApiError;
use crate::domains::auth::Role;

/// Role-gated operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Publish own coordinates
    PostLocation,

    /// Read another user's latest coordinates (still subject to a grant)
    FetchLocation,

    /// Allow a viewer to read own coordinates
    GrantPermission,
}

impl Capability {
    pub fn required_role(&self) -> Role {
        match self {
            Capability::PostLocation | Capability::GrantPermission => Role::Sharer,
            Capability::FetchLocation => Role::Viewer,
        }
    }

    /// Error returned when an actor with the wrong role asks for this capability
    pub fn denied(&self) -> ApiError {
        match self {
            Capability::PostLocation => ApiError::OnlySharersCanPost,
            Capability::FetchLocation => ApiError::OnlyViewersCanFetch,
            Capability::GrantPermission => ApiError::OnlySharersCanGrant,
        }
    }
}
