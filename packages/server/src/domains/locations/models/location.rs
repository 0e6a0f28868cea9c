use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// One reported position of a sharer
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Location {
    pub id: i64,
    pub email: String,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: DateTime<Utc>,
}

impl Location {
    pub async fn create(
        email: &str,
        latitude: f64,
        longitude: f64,
        pool: &PgPool,
    ) -> Result<Self> {
        let location = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO locations (email, latitude, longitude)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(pool)
        .await?;
        Ok(location)
    }

    pub async fn find_latest(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        let location = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM locations
            WHERE email = $1
            ORDER BY recorded_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(location)
    }
}
