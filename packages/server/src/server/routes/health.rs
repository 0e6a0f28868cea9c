use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use tracing::error;

use crate::server::app::AxumAppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    store: StoreHealth,
}

#[derive(Serialize)]
pub struct StoreHealth {
    backend: &'static str,
    status: String,
}

/// Health check endpoint
///
/// With Postgres configured, runs `SELECT 1` under a 5s timeout.
/// Returns 200 OK if the store answers, 503 Service Unavailable otherwise.
/// Failure details go to the log only.
pub async fn health_handler(
    Extension(state): Extension<AxumAppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let store = match &state.deps.db_pool {
        None => StoreHealth {
            backend: "memory",
            status: "ok".to_string(),
        },
        Some(pool) => match tokio::time::timeout(
            std::time::Duration::from_secs(5),
            sqlx::query("SELECT 1").execute(pool),
        )
        .await
        {
            Ok(Ok(_)) => StoreHealth {
                backend: "postgres",
                status: "ok".to_string(),
            },
            Ok(Err(e)) => {
                error!(error = %e, "Health check query failed");
                StoreHealth {
                    backend: "postgres",
                    status: "error".to_string(),
                }
            }
            Err(_) => {
                error!("Health check query timed out (>5s)");
                StoreHealth {
                    backend: "postgres",
                    status: "error".to_string(),
                }
            }
        },
    };

    let is_healthy = store.status == "ok";

    let (status_code, overall_status) = if is_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status: overall_status.to_string(),
            store,
        }),
    )
}
