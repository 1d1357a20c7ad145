//! Shared library for the wallet admin backend
//!
//! This crate provides the pieces every binary in the workspace needs:
//! - Configuration loaded from environment variables
//! - Database connection pooling and migrations
//! - Row models matching the PostgreSQL schema
//! - Error handling types
//! - Logging infrastructure

pub mod config;
pub mod db;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{AdminBootstrapConfig, Config, DatabaseConfig, ServerConfig, StorageConfig};
pub use db::DbPool;
pub use error::{Error, Result};

/// Initialize tracing subscriber for structured logging
///
/// `RUST_LOG` overrides the default filter. Set `LOG_FORMAT=json` to emit
/// one JSON object per event instead of the human-readable format.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shared=debug,wallet_api=debug,info".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
