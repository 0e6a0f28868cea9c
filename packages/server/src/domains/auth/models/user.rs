use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What a user may do: publish coordinates or read someone else's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Sharer,
    Viewer,
}

#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Sharer => "sharer",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sharer" => Ok(Role::Sharer),
            "viewer" => Ok(Role::Viewer),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A person who has verified an email address at least once.
///
/// The role is chosen at the first successful verification and never
/// changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl User {
    /// Insert a verified user unless one already exists.
    ///
    /// Returns the stored user and whether this call created it. When two
    /// first verifications race, the row that lands first decides the role.
    pub async fn find_or_create(email: &str, role: Role, pool: &PgPool) -> Result<(Self, bool)> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, role, verified)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(role.as_str())
        .fetch_optional(pool)
        .await?;

        if let Some(user) = created {
            return Ok((user, true));
        }

        let existing = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(pool)
            .await?;
        Ok((existing, false))
    }
}
