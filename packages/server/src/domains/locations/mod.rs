//! Locations domain - append-only coordinate history per sharer
//!
//! Every post appends a row; the "current" location is the newest row by
//! timestamp, ties broken by insertion order.

pub mod actions;
pub mod models;

pub use models::Location;
