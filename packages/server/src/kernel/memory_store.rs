//! In-memory implementation of every store trait
//!
//! All tables sit behind one mutex, so each trait call is a transaction.
//! Used by tests and by the server when no DATABASE_URL is configured.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{BaseLocationStore, BaseOtpStore, BasePermissionStore, BaseUserStore};
use crate::domains::auth::{OtpCode, Role, User};
use crate::domains::locations::Location;
use crate::domains::permissions::PermissionGrant;

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    otp_codes: Vec<OtpCode>,
    /// Keyed by (viewer_email, sharer_email)
    grants: HashMap<(String, String), PermissionGrant>,
    locations: Vec<Location>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every OTP record ever issued for `email`, oldest first
    pub async fn otp_codes_for(&self, email: &str) -> Vec<OtpCode> {
        let tables = self.tables.lock().await;
        tables
            .otp_codes
            .iter()
            .filter(|otp| otp.email == email)
            .cloned()
            .collect()
    }

    /// Every location recorded for `email`, oldest first
    pub async fn locations_for(&self, email: &str) -> Vec<Location> {
        let tables = self.tables.lock().await;
        tables
            .locations
            .iter()
            .filter(|location| location.email == email)
            .cloned()
            .collect()
    }

    /// Insert a location with an explicit timestamp
    pub async fn record_at(
        &self,
        email: &str,
        latitude: f64,
        longitude: f64,
        recorded_at: DateTime<Utc>,
    ) -> Location {
        let mut tables = self.tables.lock().await;
        let location = Location {
            id: tables.next_id(),
            email: email.to_string(),
            latitude,
            longitude,
            recorded_at,
        };
        tables.locations.push(location.clone());
        location
    }
}

#[async_trait]
impl BaseUserStore for MemoryStore {
    async fn find_or_create(&self, email: &str, role: Role) -> Result<(User, bool)> {
        let mut tables = self.tables.lock().await;
        if let Some(user) = tables.users.get(email) {
            return Ok((user.clone(), false));
        }

        let user = User {
            email: email.to_string(),
            role,
            verified: true,
            created_at: Utc::now(),
        };
        tables.users.insert(email.to_string(), user.clone());
        Ok((user, true))
    }
}

#[async_trait]
impl BaseOtpStore for MemoryStore {
    async fn create(&self, email: &str, code: &str, expires_at: DateTime<Utc>) -> Result<OtpCode> {
        let mut tables = self.tables.lock().await;
        let otp = OtpCode {
            id: tables.next_id(),
            email: email.to_string(),
            code: code.to_string(),
            expires_at,
            consumed: false,
            created_at: Utc::now(),
        };
        tables.otp_codes.push(otp.clone());
        Ok(otp)
    }

    async fn find_latest_unconsumed(&self, email: &str) -> Result<Option<OtpCode>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .otp_codes
            .iter()
            .rev()
            .find(|otp| otp.email == email && !otp.consumed)
            .cloned())
    }

    async fn consume(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        match tables
            .otp_codes
            .iter_mut()
            .find(|otp| otp.id == id && !otp.consumed)
        {
            Some(otp) => {
                otp.consumed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl BasePermissionStore for MemoryStore {
    async fn grant(&self, sharer_email: &str, viewer_email: &str) -> Result<PermissionGrant> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let grant = tables
            .grants
            .entry((viewer_email.to_string(), sharer_email.to_string()))
            .and_modify(|grant| {
                grant.granted = true;
                grant.updated_at = now;
            })
            .or_insert_with(|| PermissionGrant {
                viewer_email: viewer_email.to_string(),
                sharer_email: sharer_email.to_string(),
                granted: true,
                created_at: now,
                updated_at: now,
            });
        Ok(grant.clone())
    }

    async fn is_granted(&self, viewer_email: &str, sharer_email: &str) -> Result<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .grants
            .get(&(viewer_email.to_string(), sharer_email.to_string()))
            .is_some_and(|grant| grant.granted))
    }

    async fn viewers_of(&self, sharer_email: &str) -> Result<Vec<PermissionGrant>> {
        let tables = self.tables.lock().await;
        let mut grants: Vec<PermissionGrant> = tables
            .grants
            .values()
            .filter(|grant| grant.sharer_email == sharer_email && grant.granted)
            .cloned()
            .collect();
        grants.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(grants)
    }
}

#[async_trait]
impl BaseLocationStore for MemoryStore {
    async fn record(&self, email: &str, latitude: f64, longitude: f64) -> Result<Location> {
        Ok(self.record_at(email, latitude, longitude, Utc::now()).await)
    }

    async fn latest(&self, email: &str) -> Result<Option<Location>> {
        let tables = self.tables.lock().await;
        // Equal timestamps resolve to the later insert
        Ok(tables
            .locations
            .iter()
            .filter(|location| location.email == email)
            .max_by_key(|location| (location.recorded_at, location.id))
            .cloned())
    }
}
