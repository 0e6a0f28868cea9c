use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Permission for `viewer_email` to read `sharer_email`'s location.
///
/// Unique per (viewer, sharer) pair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PermissionGrant {
    pub viewer_email: String,
    pub sharer_email: String,
    pub granted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl PermissionGrant {
    /// Insert or re-affirm a grant in a single statement
    pub async fn upsert(sharer_email: &str, viewer_email: &str, pool: &PgPool) -> Result<Self> {
        let grant = sqlx::query_as::<_, PermissionGrant>(
            r#"
            INSERT INTO permission_grants (viewer_email, sharer_email, granted)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (viewer_email, sharer_email)
            DO UPDATE SET granted = TRUE, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(viewer_email)
        .bind(sharer_email)
        .fetch_one(pool)
        .await?;
        Ok(grant)
    }

    pub async fn is_granted(viewer_email: &str, sharer_email: &str, pool: &PgPool) -> Result<bool> {
        let granted = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM permission_grants
                WHERE viewer_email = $1 AND sharer_email = $2 AND granted = TRUE
            )
            "#,
        )
        .bind(viewer_email)
        .bind(sharer_email)
        .fetch_one(pool)
        .await?;
        Ok(granted)
    }

    pub async fn find_by_sharer(sharer_email: &str, pool: &PgPool) -> Result<Vec<Self>> {
        let grants = sqlx::query_as::<_, PermissionGrant>(
            r#"
            SELECT * FROM permission_grants
            WHERE sharer_email = $1 AND granted = TRUE
            ORDER BY created_at ASC
            "#,
        )
        .bind(sharer_email)
        .fetch_all(pool)
        .await?;
        Ok(grants)
    }
}
