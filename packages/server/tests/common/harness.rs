//! Test harness for driving the HTTP surface in-process.
//!
//! `TestHarness::new` gives every test fresh in-memory stores and mock
//! mail/DNS collaborators, so tests are independent and need no containers.
//! `TestHarness::postgres` runs the same router on a shared Postgres
//! container: the container starts and migrations run once per test binary.

use anyhow::{Context, Result};
use axum::Router;
use locshare_core::kernel::test_dependencies::{MockEmailSender, MockMxResolver};
use locshare_core::kernel::{ServerDeps, TestDependencies};
use locshare_core::server::build_app;
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use super::ApiClient;

/// Postgres container shared by every test in a binary
struct SharedPostgres {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_POSTGRES: OnceCell<SharedPostgres> = OnceCell::const_new();

impl SharedPostgres {
    async fn init() -> Result<Self> {
        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_POSTGRES
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared Postgres container")
            })
            .await
    }
}

fn init_tracing() {
    // Respect RUST_LOG; try_init so repeated harnesses don't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct TestHarness {
    /// Mocks, plus the in-memory store when not running on Postgres
    pub deps: TestDependencies,
    /// Set when the stores are backed by Postgres
    pub db_pool: Option<PgPool>,
    server_deps: ServerDeps,
    router: Router,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_dependencies(TestDependencies::new())
    }

    pub fn with_dependencies(deps: TestDependencies) -> Self {
        let server_deps = deps.server_deps();
        Self::build(deps, None, server_deps)
    }

    pub fn with_failing_mailer() -> Self {
        Self::with_dependencies(TestDependencies::new().with_mailer(MockEmailSender::failing()))
    }

    pub fn with_mx_resolver(resolver: MockMxResolver) -> Self {
        Self::with_dependencies(TestDependencies::new().with_mx_resolver(resolver))
    }

    /// Mock collaborators with every store on `pool`
    pub fn with_db_pool(pool: PgPool) -> Self {
        let deps = TestDependencies::new();
        let server_deps = deps.postgres_deps(pool.clone());
        Self::build(deps, Some(pool), server_deps)
    }

    /// Stores on the shared, migrated Postgres container.
    ///
    /// Tables are shared between tests, so tests must use unique emails.
    pub async fn postgres() -> Self {
        let infra = SharedPostgres::get().await;
        let pool = PgPool::connect(&infra.db_url)
            .await
            .expect("Failed to connect to test database");
        Self::with_db_pool(pool)
    }

    fn build(deps: TestDependencies, db_pool: Option<PgPool>, server_deps: ServerDeps) -> Self {
        init_tracing();

        let router = build_app(server_deps.clone(), &["*".to_string()]);
        Self {
            deps,
            db_pool,
            server_deps,
            router,
        }
    }

    /// Client with no credentials
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.router.clone(), None)
    }

    /// Client sending `Authorization: Bearer <token>`
    pub fn client_with_token(&self, token: &str) -> ApiClient {
        ApiClient::new(self.router.clone(), Some(token.to_string()))
    }

    /// Deps over the same stores the router uses, for calling actions directly
    pub fn server_deps(&self) -> ServerDeps {
        self.server_deps.clone()
    }

    /// Pool of a Postgres-backed harness
    pub fn pool(&self) -> &PgPool {
        self.db_pool
            .as_ref()
            .expect("harness is not backed by Postgres")
    }

    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.deps.mailer.last_code_for(email)
    }
}
