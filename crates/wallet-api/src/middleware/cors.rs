//! CORS configuration
//!
//! - `CORS_ALLOWED_ORIGINS`: comma-separated whitelist
//! - `ENVIRONMENT=production`: only HTTPS origins are accepted and the
//!   whitelist must be set explicitly
//!
//! Without a whitelist, development allows the two local dev servers the web
//! client runs on (`localhost:3000` for CRA, `localhost:5173` for Vite).

use actix_cors::Cors;
use actix_web::http::header;
use std::env;
use tracing::{debug, warn};

const DEV_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Build the CORS middleware from the environment
pub fn cors() -> Cors {
    let is_production = env::var("ENVIRONMENT")
        .map(|v| v.eq_ignore_ascii_case("production"))
        .unwrap_or(false);

    let raw = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| {
        if is_production {
            warn!("CORS_ALLOWED_ORIGINS not set in production; cross-origin requests will be blocked");
            String::new()
        } else {
            DEV_ORIGINS.to_string()
        }
    });

    let origins = parse_origins(&raw, is_production);
    debug!(count = origins.len(), "CORS origins configured");

    let mut cors = Cors::default();
    for origin in &origins {
        cors = cors.allowed_origin(origin);
    }

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![header::CONTENT_TYPE])
        .max_age(3600)
}

/// Split and filter the whitelist
///
/// Wildcards and malformed entries are dropped; production drops plain HTTP.
fn parse_origins(raw: &str, is_production: bool) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|origin| {
            if *origin == "*" {
                warn!("Wildcard CORS origin ignored");
                return false;
            }
            if !origin.starts_with("http://") && !origin.starts_with("https://") {
                warn!(origin = %origin, "Malformed CORS origin ignored");
                return false;
            }
            if is_production && !origin.starts_with("https://") {
                warn!(origin = %origin, "Non-HTTPS CORS origin ignored in production");
                return false;
            }
            true
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn test_parse_origins_development() {
        let origins = parse_origins(DEV_ORIGINS, false);
        assert_eq!(
            origins,
            vec!["http://localhost:3000", "http://localhost:5173"]
        );
    }

    #[actix_web::test]
    async fn test_parse_origins_filters_invalid() {
        let origins = parse_origins("*, ftp://x.com, https://app.example.com,,", false);
        assert_eq!(origins, vec!["https://app.example.com"]);
    }

    #[actix_web::test]
    async fn test_parse_origins_production_https_only() {
        let origins = parse_origins("http://app.example.com,https://app.example.com", true);
        assert_eq!(origins, vec!["https://app.example.com"]);
    }

    #[actix_web::test]
    async fn test_disallowed_origin_gets_no_header() {
        let app = test::init_service(
            App::new()
                .wrap(cors())
                .route("/t", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/t")
            .insert_header(("Origin", "http://evil.example"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(!resp
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}
