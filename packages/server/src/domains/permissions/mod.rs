//! Permissions domain - directed viewer -> sharer grants
//!
//! A grant lets one viewer read one sharer's latest location. Grants are
//! sticky: there is no revoke, and granting twice is a no-op.

pub mod actions;
pub mod models;

pub use models::PermissionGrant;
