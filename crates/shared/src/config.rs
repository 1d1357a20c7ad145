//! Configuration management using environment variables
//!
//! # Security
//!
//! - JWT_SECRET must be at least 32 characters in release builds
//! - Release builds reject known weak or default secrets
//! - Debug builds warn but allow a development default

use crate::error::{Error, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Default port, matching the port the web client is built against
const DEFAULT_PORT: u16 = 5000;

/// Default maximum decoded size of an uploaded document (5 MiB)
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,

    /// Server configuration
    pub server: ServerConfig,

    /// Default administrator created on first start
    pub admin: AdminBootstrapConfig,

    /// Uploaded file storage
    pub storage: StorageConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual parts
    pub url: Option<String>,

    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections kept open
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,

    /// SSL mode: disable, allow, prefer, require, verify-ca, verify-full
    pub ssl_mode: String,
}

impl DatabaseConfig {
    /// Build a PostgreSQL connection URL
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.password, self.host, self.port, self.name, self.ssl_mode
        )
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// HMAC secret for signing JWTs
    pub jwt_secret: String,

    /// Lifetime of issued tokens in hours
    pub jwt_expiration_hours: i64,
}

/// Default administrator account
///
/// Both fields must be present for the bootstrap to run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminBootstrapConfig {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl AdminBootstrapConfig {
    /// Email and password, if both are configured and non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some((email.trim(), password))
            }
            _ => None,
        }
    }
}

/// Uploaded file storage
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory; KYC documents live under `<root>/kyc`
    pub uploads_dir: String,

    /// Maximum decoded size of a single uploaded document
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());

        // DB_PASSWORD is only mandatory when no full URL is given
        let password = match env::var("DB_PASSWORD") {
            Ok(p) => p,
            Err(_) if database_url.is_some() => String::new(),
            Err(_) => {
                return Err(Error::config(
                    "DB_PASSWORD must be set (or provide DATABASE_URL)",
                ))
            }
        };

        Ok(Self {
            database: DatabaseConfig {
                url: database_url,
                host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: parse_var("DB_PORT", 5432)?,
                name: env::var("DB_NAME").unwrap_or_else(|_| "wallet_admin".to_string()),
                user: env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
                password,
                max_connections: parse_var("DB_MAX_CONNECTIONS", 20)?,
                min_connections: parse_var("DB_MIN_CONNECTIONS", 2)?,
                acquire_timeout_secs: parse_var("DB_ACQUIRE_TIMEOUT", 5)?,
                idle_timeout_secs: parse_var("DB_IDLE_TIMEOUT", 180)?,
                max_lifetime_secs: parse_var("DB_MAX_LIFETIME", 900)?,
                ssl_mode: env::var("DB_SSL_MODE").unwrap_or_else(|_| {
                    if cfg!(debug_assertions) {
                        "prefer".to_string()
                    } else {
                        "require".to_string()
                    }
                }),
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", DEFAULT_PORT)?,
                jwt_secret: Self::load_jwt_secret()?,
                jwt_expiration_hours: parse_var("JWT_EXPIRATION_HOURS", 24)?,
            },
            admin: AdminBootstrapConfig {
                email: env::var("ADMIN_EMAIL").ok(),
                password: env::var("ADMIN_PASSWORD").ok(),
            },
            storage: StorageConfig {
                uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()),
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            },
        })
    }

    fn load_jwt_secret() -> Result<String> {
        let secret = if cfg!(debug_assertions) {
            env::var("JWT_SECRET").unwrap_or_else(|_| {
                tracing::warn!(
                    "JWT_SECRET not set - using development default. \
                     DO NOT use in production!"
                );
                "dev_secret_change_in_production_32chars".to_string()
            })
        } else {
            env::var("JWT_SECRET").map_err(|_| {
                Error::config("JWT_SECRET environment variable must be set in production")
            })?
        };

        match validate_jwt_secret(&secret) {
            Ok(()) => Ok(secret),
            Err(e) if cfg!(debug_assertions) => {
                tracing::error!(
                    "{}. Acceptable in development but MUST be fixed for production",
                    e
                );
                Ok(secret)
            }
            Err(e) => Err(e),
        }
    }
}

/// Check a JWT secret against the production requirements
///
/// # Errors
///
/// Returns a config error describing the first requirement the secret fails.
pub fn validate_jwt_secret(secret: &str) -> Result<()> {
    const WEAK_PATTERNS: &[&str] = &[
        "dev_secret",
        "change_me",
        "changeme",
        "example",
        "password",
        "default",
        "your_secret",
        "your-secret",
        "jwt_secret",
        "jwt-secret",
    ];

    if secret.len() < 32 {
        return Err(Error::config(format!(
            "JWT_SECRET must be at least 32 characters (got {}). \
             Generate one with: openssl rand -base64 32",
            secret.len()
        )));
    }

    let lower = secret.to_lowercase();
    if let Some(pattern) = WEAK_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(Error::config(format!(
            "JWT_SECRET contains weak pattern '{}'",
            pattern
        )));
    }

    let unique: std::collections::HashSet<char> = secret.chars().collect();
    if unique.len() < 10 {
        return Err(Error::config(
            "JWT_SECRET has low entropy (too few unique characters)",
        ));
    }

    Ok(())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
