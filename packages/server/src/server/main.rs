// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use locshare_core::domains::auth::JwtService;
use locshare_core::kernel::{HickoryMxResolver, MailerAdapter, MemoryStore, ServerDeps};
use locshare_core::{server::build_app, Config};
use mailer::{Mailer, MailerOptions};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,locshare_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting location sharing API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let mailer = Mailer::new(MailerOptions {
        host: config.smtp.host.clone(),
        port: config.smtp.port,
        username: config.smtp.username.clone(),
        password: config.smtp.password.clone(),
        from: config.smtp.from.clone(),
        starttls: config.smtp.starttls,
        timeout: config.upstream_timeout,
    })
    .context("Failed to configure SMTP mailer")?;
    let mailer = Arc::new(MailerAdapter::new(Arc::new(mailer)));

    let mx_resolver = Arc::new(HickoryMxResolver::from_system_conf());
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));
    let otp_ttl =
        chrono::Duration::from_std(config.otp_ttl).context("OTP_TTL_SECONDS is out of range")?;

    let deps = match &config.database_url {
        Some(database_url) => {
            // Connect to database
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connected");

            // Run migrations
            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations complete");

            ServerDeps::postgres(
                pool,
                mailer,
                mx_resolver,
                jwt_service,
                otp_ttl,
                config.upstream_timeout,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set - using in-memory store, data will not persist");
            ServerDeps::in_memory(
                MemoryStore::new(),
                mailer,
                mx_resolver,
                jwt_service,
                otp_ttl,
                config.upstream_timeout,
            )
        }
    };

    // Build application
    let app = build_app(deps, &config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
