//! Wallet admin API server
//!
//! REST API for customer wallets: registration, KYC documents, deposit and
//! withdraw requests, and the admin console that reviews them.

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use shared::{db, Config};
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use wallet_api::handlers::helpers::extractor_error;
use wallet_api::openapi::ApiDoc;
use wallet_api::services::{bootstrap, DocumentStorage, LoginRateLimiter};
use wallet_api::{middleware, routes};

/// Largest accepted JSON body; uploads travel base64-encoded
const JSON_LIMIT_BYTES: usize = 8 * 1024 * 1024;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    shared::init_tracing();

    tracing::info!("Starting wallet API...");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Create database connection pool
    let db_pool = db::create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;

    // Run database migrations
    db::run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    // Default admin account; never fatal
    let outcome = bootstrap::ensure_default_admin(&db_pool, &config.admin).await;
    tracing::debug!(?outcome, "Admin bootstrap finished");

    let storage = DocumentStorage::from_config(&config.storage);
    storage
        .ensure_dir()
        .await
        .with_context(|| format!("Failed to create upload directory {}", storage.dir().display()))?;

    let login_limiter = LoginRateLimiter::new();

    let server_addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Wallet API listening on {}", server_addr);

    let jwt_secret = config.server.jwt_secret.clone();

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            // Runs inside the TracingLogger span so the ID lands on it
            .wrap(middleware::RequestId::default())
            .wrap(TracingLogger::default())
            .wrap(middleware::SecurityHeaders::default())
            .wrap(middleware::cors())
            // Extractor failures use the standard error body
            .app_data(
                web::JsonConfig::default()
                    .limit(JSON_LIMIT_BYTES)
                    .error_handler(|err, req| extractor_error(err, req)),
            )
            .app_data(web::QueryConfig::default().error_handler(|err, req| extractor_error(err, req)))
            .app_data(web::PathConfig::default().error_handler(|err, req| extractor_error(err, req)))
            // Shared state
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(login_limiter.clone()))
            .service(
                SwaggerUi::new("/api/docs/{_:.*}").url("/api/docs/openapi.json", ApiDoc::openapi()),
            )
            .configure(|cfg| routes::configure(cfg, &jwt_secret))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind to {}", server_addr))?
    .run()
    .await
    .context("Server error")?;

    Ok(())
}
