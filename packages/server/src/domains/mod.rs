// Business domains
pub mod auth;
pub mod locations;
pub mod permissions;
