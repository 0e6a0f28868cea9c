//! Postgres-backed stores
//!
//! Thin adapters from the store traits onto the model queries.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{BaseLocationStore, BaseOtpStore, BasePermissionStore, BaseUserStore};
use crate::domains::auth::{OtpCode, Role, User};
use crate::domains::locations::Location;
use crate::domains::permissions::PermissionGrant;

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseUserStore for PostgresStore {
    async fn find_or_create(&self, email: &str, role: Role) -> Result<(User, bool)> {
        User::find_or_create(email, role, &self.pool).await
    }
}

#[async_trait]
impl BaseOtpStore for PostgresStore {
    async fn create(&self, email: &str, code: &str, expires_at: DateTime<Utc>) -> Result<OtpCode> {
        OtpCode::create(email, code, expires_at, &self.pool).await
    }

    async fn find_latest_unconsumed(&self, email: &str) -> Result<Option<OtpCode>> {
        OtpCode::find_latest_unconsumed(email, &self.pool).await
    }

    async fn consume(&self, id: i64) -> Result<bool> {
        OtpCode::consume(id, &self.pool).await
    }
}

#[async_trait]
impl BasePermissionStore for PostgresStore {
    async fn grant(&self, sharer_email: &str, viewer_email: &str) -> Result<PermissionGrant> {
        PermissionGrant::upsert(sharer_email, viewer_email, &self.pool).await
    }

    async fn is_granted(&self, viewer_email: &str, sharer_email: &str) -> Result<bool> {
        PermissionGrant::is_granted(viewer_email, sharer_email, &self.pool).await
    }

    async fn viewers_of(&self, sharer_email: &str) -> Result<Vec<PermissionGrant>> {
        PermissionGrant::find_by_sharer(sharer_email, &self.pool).await
    }
}

#[async_trait]
impl BaseLocationStore for PostgresStore {
    async fn record(&self, email: &str, latitude: f64, longitude: f64) -> Result<Location> {
        Location::create(email, latitude, longitude, &self.pool).await
    }

    async fn latest(&self, email: &str) -> Result<Option<Location>> {
        Location::find_latest(email, &self.pool).await
    }
}
