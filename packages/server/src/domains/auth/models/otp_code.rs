use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A one-time passcode issued to an email address.
///
/// Rows are never deleted; a consumed row stays behind as an audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OtpCode {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
    pub created_at: DateTime<Utc>,
}

impl OtpCode {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Exact string comparison, no normalisation of the submitted code
    pub fn matches(&self, code: &str) -> bool {
        self.code == code
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl OtpCode {
    pub async fn create(
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Self> {
        let otp = sqlx::query_as::<_, OtpCode>(
            r#"
            INSERT INTO otp_codes (email, code, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(code)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;
        Ok(otp)
    }

    /// Most recently issued code for this email that has not been used yet
    pub async fn find_latest_unconsumed(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        let otp = sqlx::query_as::<_, OtpCode>(
            r#"
            SELECT * FROM otp_codes
            WHERE email = $1 AND consumed = FALSE
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(otp)
    }

    /// Mark a code as used. Returns false if another request consumed it first.
    pub async fn consume(id: i64, pool: &PgPool) -> Result<bool> {
        let consumed = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE otp_codes
            SET consumed = TRUE
            WHERE id = $1 AND consumed = FALSE
            RETURNING id
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(consumed.is_some())
    }
}
