//! Security response headers
//!
//! Adds `X-Content-Type-Options`, `X-Frame-Options`, `Referrer-Policy`,
//! `Permissions-Policy` and, when enabled, `Strict-Transport-Security`.
//!
//! - `ENABLE_HSTS`: "true"/"false" (default: on in release builds)
//! - `HSTS_MAX_AGE`: seconds (default one year)

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    env,
    future::{ready, Ready},
    rc::Rc,
};

#[derive(Debug, Clone)]
pub struct SecurityHeadersConfig {
    pub enable_hsts: bool,
    pub hsts_max_age: u64,
    /// DENY or SAMEORIGIN
    pub frame_options: &'static str,
    pub referrer_policy: &'static str,
}

impl SecurityHeadersConfig {
    pub fn from_env() -> Self {
        let enable_hsts = env::var("ENABLE_HSTS")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(!cfg!(debug_assertions));

        let hsts_max_age = env::var("HSTS_MAX_AGE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(31_536_000);

        Self {
            enable_hsts,
            hsts_max_age,
            frame_options: "DENY",
            referrer_policy: "strict-origin-when-cross-origin",
        }
    }
}

pub struct SecurityHeaders {
    config: Rc<SecurityHeadersConfig>,
}

impl SecurityHeaders {
    pub fn new(config: SecurityHeadersConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }
}

impl Default for SecurityHeaders {
    fn default() -> Self {
        Self::new(SecurityHeadersConfig::from_env())
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddleware {
            service: Rc::new(service),
            config: self.config.clone(),
        }))
    }
}

pub struct SecurityHeadersMiddleware<S> {
    service: Rc<S>,
    config: Rc<SecurityHeadersConfig>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let config = self.config.clone();

        Box::pin(async move {
            let mut res = service.call(req).await?;
            let headers = res.headers_mut();

            headers.insert(
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static("nosniff"),
            );
            headers.insert(
                HeaderName::from_static("x-frame-options"),
                HeaderValue::from_static(config.frame_options),
            );
            headers.insert(
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static(config.referrer_policy),
            );
            headers.insert(
                HeaderName::from_static("permissions-policy"),
                HeaderValue::from_static("camera=(), geolocation=(), microphone=(), payment=()"),
            );

            if config.enable_hsts {
                let value = format!("max-age={}; includeSubDomains", config.hsts_max_age);
                if let Ok(value) = HeaderValue::try_from(value) {
                    headers.insert(HeaderName::from_static("strict-transport-security"), value);
                }
            }

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    fn config(enable_hsts: bool) -> SecurityHeadersConfig {
        SecurityHeadersConfig {
            enable_hsts,
            hsts_max_age: 600,
            frame_options: "DENY",
            referrer_policy: "no-referrer",
        }
    }

    #[actix_web::test]
    async fn test_headers_present() {
        let app = test::init_service(
            App::new()
                .wrap(SecurityHeaders::new(config(false)))
                .route("/t", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/t").to_request()).await;
        let headers = resp.headers();
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
        assert_eq!(headers.get("referrer-policy").unwrap(), "no-referrer");
        assert!(headers.get("strict-transport-security").is_none());
    }

    #[actix_web::test]
    async fn test_hsts_when_enabled() {
        let app = test::init_service(
            App::new()
                .wrap(SecurityHeaders::new(config(true)))
                .route("/t", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/t").to_request()).await;
        assert_eq!(
            resp.headers().get("strict-transport-security").unwrap(),
            "max-age=600; includeSubDomains"
        );
    }
}
