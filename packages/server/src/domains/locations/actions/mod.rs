//! Locations domain actions

mod get_location;
mod post_location;

pub use get_location::get_location;
pub use post_location::post_location;
