//! Request ID middleware
//!
//! Reuses an incoming `X-Request-ID` or generates a UUID v4, records it on
//! the current tracing span and echoes it on the response.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
};
use tracing::Span;
use uuid::Uuid;

const HEADER: &str = "x-request-id";

/// Longest client-supplied ID that is accepted verbatim
const MAX_INCOMING_LEN: usize = 128;

/// Request ID available to handlers through extensions
#[derive(Debug, Clone)]
pub struct RequestIdExt(pub String);

#[derive(Default)]
pub struct RequestId;

impl RequestId {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestId
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestIdMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddleware<S>
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

        Box::pin(async move {
            let request_id = req
                .headers()
                .get(HEADER)
                .and_then(|h| h.to_str().ok())
                .filter(|s| !s.is_empty() && s.len() <= MAX_INCOMING_LEN)
                .map(str::to_string)
                .unwrap_or_else(|| Uuid::new_v4().to_string());

            req.extensions_mut().insert(RequestIdExt(request_id.clone()));
            Span::current().record("request_id", request_id.as_str());

            let mut res = service.call(req).await?;

            if let Ok(value) = HeaderValue::try_from(request_id.as_str()) {
                res.headers_mut()
                    .insert(HeaderName::from_static(HEADER), value);
            }

            Ok(res)
        })
    }
}
