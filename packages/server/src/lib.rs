// Location Sharing - API Core
//
// A sharer publishes GPS coordinates; a viewer reads the sharer's latest
// position once the sharer has granted access. Identity comes from
// email one-time passcodes exchanged for signed session tokens.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
