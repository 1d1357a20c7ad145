//! JWT Bearer Authentication
//!
//! Validates `Authorization: Bearer <jwt>` and stores the decoded [`Claims`]
//! in request extensions for handlers.
//!
//! Two flavours share one implementation:
//! - [`JwtAuth::new`] accepts any valid token
//! - [`JwtAuth::admin`] additionally requires the `admin` role
//!
//! A missing or invalid token always yields 401; a valid token with the
//! wrong role yields 403.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    Error, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
};
use tracing::debug;

use crate::models::{Claims, ErrorResponse};
use crate::services::tokens;

/// Bearer token authentication middleware
pub struct JwtAuth {
    secret: Rc<String>,
    admin_only: bool,
}

impl JwtAuth {
    /// Accept any authenticated user
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Rc::new(secret.into()),
            admin_only: false,
        }
    }

    /// Accept administrators only
    pub fn admin(secret: impl Into<String>) -> Self {
        Self {
            secret: Rc::new(secret.into()),
            admin_only: true,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            secret: self.secret.clone(),
            admin_only: self.admin_only,
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    secret: Rc<String>,
    admin_only: bool,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let secret = self.secret.clone();
        let admin_only = self.admin_only;

        Box::pin(async move {
            let token = match bearer_token(req.headers()) {
                Some(token) => token,
                None => {
                    let resp = HttpResponse::Unauthorized().json(ErrorResponse::new(
                        "unauthorized",
                        "Authentication required",
                    ));
                    return Ok(req.into_response(resp).map_into_right_body());
                }
            };

            let claims = match tokens::decode_token(&token, &secret) {
                Ok(claims) => claims,
                Err(e) => {
                    debug!(error = %e, path = %req.path(), "Rejected bearer token");
                    let resp = HttpResponse::Unauthorized().json(ErrorResponse::new(
                        "invalid_token",
                        "Invalid or expired token",
                    ));
                    return Ok(req.into_response(resp).map_into_right_body());
                }
            };

            if admin_only && !claims.role.is_admin() {
                debug!(user_id = %claims.sub, path = %req.path(), "Non-admin on admin route");
                let resp = HttpResponse::Forbidden()
                    .json(ErrorResponse::new("forbidden", "Admin access required"));
                return Ok(req.into_response(resp).map_into_right_body());
            }

            req.extensions_mut().insert(claims);

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Extract the token from an `Authorization: Bearer` header
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Claims placed in extensions by [`JwtAuth`]
pub fn get_claims(req: &HttpRequest) -> Result<Claims, HttpResponse> {
    req.extensions().get::<Claims>().cloned().ok_or_else(|| {
        HttpResponse::Unauthorized().json(ErrorResponse::new(
            "unauthorized",
            "Authentication required",
        ))
    })
}

/// Authenticated user id
pub fn get_user_id(req: &HttpRequest) -> Result<String, HttpResponse> {
    get_claims(req).map(|c| c.sub)
}

/// Claims of an authenticated administrator, or 403
pub fn require_admin(req: &HttpRequest) -> Result<Claims, HttpResponse> {
    let claims = get_claims(req)?;
    if !claims.role.is_admin() {
        return Err(HttpResponse::Forbidden()
            .json(ErrorResponse::new("forbidden", "Admin access required")));
    }
    Ok(claims)
}

/// Claims of an authenticated customer (role `user`), or 403
pub fn require_customer(req: &HttpRequest) -> Result<Claims, HttpResponse> {
    let claims = get_claims(req)?;
    if claims.role.is_admin() {
        return Err(HttpResponse::Forbidden().json(ErrorResponse::new(
            "forbidden",
            "Only customer accounts can perform this action",
        )));
    }
    Ok(claims)
}
