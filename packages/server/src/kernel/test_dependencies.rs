// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseEmailSender, BaseMxResolver, MemoryStore, ServerDeps};
use crate::domains::auth::otp::OTP_LENGTH;
use crate::domains::auth::JwtService;

// =============================================================================
// Mock Email Sender
// =============================================================================

/// A message handed to the mock sender
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl SentEmail {
    /// The passcode embedded in the body, if any
    pub fn code(&self) -> Option<String> {
        self.body
            .split(|c: char| !c.is_ascii_digit())
            .find(|digits| digits.len() == OTP_LENGTH)
            .map(str::to_string)
    }
}

#[derive(Default)]
pub struct MockEmailSender {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    fail: bool,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every delivery fails (messages are still recorded)
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Code from the most recent message sent to `to`
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|email| email.to == to)
            .and_then(SentEmail::code)
    }
}

#[async_trait]
impl BaseEmailSender for MockEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });

        if self.fail {
            anyhow::bail!("SMTP relay rejected message");
        }
        Ok(())
    }
}

// =============================================================================
// Mock MX Resolver
// =============================================================================

enum ResolverBehavior {
    Answer,
    Fail,
    Hang,
}

pub struct MockMxResolver {
    domains: HashSet<String>,
    behavior: ResolverBehavior,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MockMxResolver {
    /// Resolver that knows no domains until `with_domain` is called
    pub fn new() -> Self {
        Self {
            domains: HashSet::new(),
            behavior: ResolverBehavior::Answer,
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every lookup errors
    pub fn failing() -> Self {
        Self {
            behavior: ResolverBehavior::Fail,
            ..Self::new()
        }
    }

    /// Every lookup never completes
    pub fn hanging() -> Self {
        Self {
            behavior: ResolverBehavior::Hang,
            ..Self::new()
        }
    }

    pub fn with_domain(mut self, domain: &str) -> Self {
        self.domains.insert(domain.to_string());
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl Default for MockMxResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMxResolver for MockMxResolver {
    async fn has_mx_records(&self, domain: &str) -> Result<bool> {
        self.lookups.lock().unwrap().push(domain.to_string());

        match self.behavior {
            ResolverBehavior::Answer => Ok(self.domains.contains(domain)),
            ResolverBehavior::Fail => anyhow::bail!("SERVFAIL"),
            ResolverBehavior::Hang => {
                std::future::pending::<()>().await;
                Ok(false)
            }
        }
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// In-memory stores plus mock collaborators, wired into a ServerDeps
pub struct TestDependencies {
    pub store: MemoryStore,
    pub mailer: Arc<MockEmailSender>,
    pub mx_resolver: Arc<MockMxResolver>,
    pub jwt_service: Arc<JwtService>,
    pub otp_ttl: chrono::Duration,
    pub upstream_timeout: Duration,
}

impl TestDependencies {
    /// Defaults: MX records for example.com, x.com, y.com and b.com; 10 minute OTPs
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            mailer: Arc::new(MockEmailSender::new()),
            mx_resolver: Arc::new(
                MockMxResolver::new()
                    .with_domain("example.com")
                    .with_domain("x.com")
                    .with_domain("y.com")
                    .with_domain("b.com"),
            ),
            jwt_service: Arc::new(JwtService::new("test_secret_key", "test_issuer".to_string())),
            otp_ttl: chrono::Duration::minutes(10),
            upstream_timeout: Duration::from_millis(200),
        }
    }

    pub fn with_mailer(mut self, mailer: MockEmailSender) -> Self {
        self.mailer = Arc::new(mailer);
        self
    }

    pub fn with_mx_resolver(mut self, resolver: MockMxResolver) -> Self {
        self.mx_resolver = Arc::new(resolver);
        self
    }

    pub fn with_otp_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.otp_ttl = ttl;
        self
    }

    /// Same mocks, with every store backed by `pool`
    pub fn postgres_deps(&self, pool: PgPool) -> ServerDeps {
        ServerDeps::postgres(
            pool,
            self.mailer.clone(),
            self.mx_resolver.clone(),
            self.jwt_service.clone(),
            self.otp_ttl,
            self.upstream_timeout,
        )
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::in_memory(
            self.store.clone(),
            self.mailer.clone(),
            self.mx_resolver.clone(),
            self.jwt_service.clone(),
            self.otp_ttl,
            self.upstream_timeout,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
