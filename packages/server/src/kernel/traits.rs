// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business rules (expiry, role checks, permission gating) live in domain actions.
//
// Naming convention: Base* for trait names (e.g., BaseOtpStore, BaseEmailSender)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domains::auth::{OtpCode, Role, User};
use crate::domains::locations::Location;
use crate::domains::permissions::PermissionGrant;

// =============================================================================
// User Store Trait
// =============================================================================

#[async_trait]
pub trait BaseUserStore: Send + Sync {
    /// Create a verified user with `role` unless one exists.
    /// Returns the stored user and whether it was created by this call.
    async fn find_or_create(&self, email: &str, role: Role) -> Result<(User, bool)>;
}

// =============================================================================
// OTP Store Trait
// =============================================================================

#[async_trait]
pub trait BaseOtpStore: Send + Sync {
    async fn create(&self, email: &str, code: &str, expires_at: DateTime<Utc>) -> Result<OtpCode>;

    /// Most recently created record for `email` with consumed = false
    async fn find_latest_unconsumed(&self, email: &str) -> Result<Option<OtpCode>>;

    /// Atomically flip consumed to true. Returns false if it already was.
    async fn consume(&self, id: i64) -> Result<bool>;
}

// =============================================================================
// Permission Store Trait
// =============================================================================

#[async_trait]
pub trait BasePermissionStore: Send + Sync {
    /// Idempotent upsert of the (viewer, sharer) grant
    async fn grant(&self, sharer_email: &str, viewer_email: &str) -> Result<PermissionGrant>;

    async fn is_granted(&self, viewer_email: &str, sharer_email: &str) -> Result<bool>;

    async fn viewers_of(&self, sharer_email: &str) -> Result<Vec<PermissionGrant>>;
}

// =============================================================================
// Location Store Trait
// =============================================================================

#[async_trait]
pub trait BaseLocationStore: Send + Sync {
    /// Append a timestamped position; never overwrites
    async fn record(&self, email: &str, latitude: f64, longitude: f64) -> Result<Location>;

    async fn latest(&self, email: &str) -> Result<Option<Location>>;
}

// =============================================================================
// Email Sender Trait (Infrastructure - OTP delivery)
// =============================================================================

#[async_trait]
pub trait BaseEmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

// =============================================================================
// MX Resolver Trait (Infrastructure - email domain checks)
// =============================================================================

#[async_trait]
pub trait BaseMxResolver: Send + Sync {
    /// Whether `domain` publishes at least one MX record
    async fn has_mx_records(&self, domain: &str) -> Result<bool>;
}
