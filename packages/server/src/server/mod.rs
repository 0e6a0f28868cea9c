// HTTP server setup (Axum + JSON routes)
pub mod app;
pub mod middleware;
pub mod routes;

pub use app::*;
