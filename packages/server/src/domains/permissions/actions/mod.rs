//! Permissions domain actions

mod grant_permission;
mod list_viewers;

pub use grant_permission::grant_permission;
pub use list_viewers::list_viewers;
