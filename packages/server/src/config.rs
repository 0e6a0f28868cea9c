use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// SMTP settings for passcode delivery
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub starttls: bool,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the server keeps all state in memory
    pub database_url: Option<String>,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub otp_ttl: Duration,
    pub upstream_timeout: Duration,
    pub smtp: SmtpConfig,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "locshare".to_string()),
            otp_ttl: Duration::from_secs(
                env::var("OTP_TTL_SECONDS")
                    .unwrap_or_else(|_| "600".to_string())
                    .parse()
                    .context("OTP_TTL_SECONDS must be a number of seconds")?,
            ),
            upstream_timeout: Duration::from_secs(
                env::var("UPSTREAM_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("UPSTREAM_TIMEOUT_SECONDS must be a number of seconds")?,
            ),
            smtp: SmtpConfig {
                host: env::var("SMTP_HOST").context("SMTP_HOST must be set")?,
                port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse()
                    .context("SMTP_PORT must be a valid number")?,
                username: env::var("SMTP_USERNAME").ok(),
                password: env::var("SMTP_PASSWORD").ok(),
                from: env::var("SMTP_FROM").context("SMTP_FROM must be set")?,
                starttls: env::var("SMTP_STARTTLS")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(true),
            },
            allowed_origins: parse_origins(
                &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
