//! Server dependencies for actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain actions.
//! All stores and external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use mailer::Mailer;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::domains::auth::JwtService;
use crate::kernel::{
    BaseEmailSender, BaseLocationStore, BaseMxResolver, BaseOtpStore, BasePermissionStore,
    BaseUserStore, MemoryStore, PostgresStore,
};

// =============================================================================
// Mailer Adapter (implements BaseEmailSender trait)
// =============================================================================

/// Wrapper around Mailer that implements BaseEmailSender trait
pub struct MailerAdapter(pub Arc<Mailer>);

impl MailerAdapter {
    pub fn new(mailer: Arc<Mailer>) -> Self {
        Self(mailer)
    }
}

#[async_trait]
impl BaseEmailSender for MailerAdapter {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        self.0
            .send(to, subject, body)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    /// Present only when running against Postgres; used for health checks
    pub db_pool: Option<PgPool>,
    pub users: Arc<dyn BaseUserStore>,
    pub otps: Arc<dyn BaseOtpStore>,
    pub permissions: Arc<dyn BasePermissionStore>,
    pub locations: Arc<dyn BaseLocationStore>,
    pub mailer: Arc<dyn BaseEmailSender>,
    pub mx_resolver: Arc<dyn BaseMxResolver>,
    /// JWT service for token creation
    pub jwt_service: Arc<JwtService>,
    /// Lifetime of an issued passcode
    pub otp_ttl: chrono::Duration,
    /// Upper bound on SMTP delivery and MX lookups
    pub upstream_timeout: Duration,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db_pool: Option<PgPool>,
        users: Arc<dyn BaseUserStore>,
        otps: Arc<dyn BaseOtpStore>,
        permissions: Arc<dyn BasePermissionStore>,
        locations: Arc<dyn BaseLocationStore>,
        mailer: Arc<dyn BaseEmailSender>,
        mx_resolver: Arc<dyn BaseMxResolver>,
        jwt_service: Arc<JwtService>,
        otp_ttl: chrono::Duration,
        upstream_timeout: Duration,
    ) -> Self {
        Self {
            db_pool,
            users,
            otps,
            permissions,
            locations,
            mailer,
            mx_resolver,
            jwt_service,
            otp_ttl,
            upstream_timeout,
        }
    }

    /// All four stores backed by one Postgres pool
    pub fn postgres(
        pool: PgPool,
        mailer: Arc<dyn BaseEmailSender>,
        mx_resolver: Arc<dyn BaseMxResolver>,
        jwt_service: Arc<JwtService>,
        otp_ttl: chrono::Duration,
        upstream_timeout: Duration,
    ) -> Self {
        let store = Arc::new(PostgresStore::new(pool.clone()));
        Self::new(
            Some(pool),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            mailer,
            mx_resolver,
            jwt_service,
            otp_ttl,
            upstream_timeout,
        )
    }

    /// All four stores backed by one in-memory store
    pub fn in_memory(
        store: MemoryStore,
        mailer: Arc<dyn BaseEmailSender>,
        mx_resolver: Arc<dyn BaseMxResolver>,
        jwt_service: Arc<JwtService>,
        otp_ttl: chrono::Duration,
        upstream_timeout: Duration,
    ) -> Self {
        let store = Arc::new(store);
        Self::new(
            None,
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            mailer,
            mx_resolver,
            jwt_service,
            otp_ttl,
            upstream_timeout,
        )
    }
}
