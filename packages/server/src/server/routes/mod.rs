// HTTP routes
pub mod auth;
pub mod health;
pub mod locations;
pub mod permissions;

pub use auth::*;
pub use health::*;
pub use locations::*;
pub use permissions::*;

use serde::Serialize;

/// `{"message": "<code>"}` acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
