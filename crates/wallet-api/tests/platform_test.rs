//! Health check, OpenAPI document and response headers

mod common;

use actix_web::{http::StatusCode, test};
use common::json_body;

#[actix_web::test]
async fn test_health_reports_unreachable_database() {
    let app = common::init_app!();

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = json_body(resp).await;
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["database"], "disconnected");
}

#[actix_web::test]
async fn test_security_headers_on_api_responses() {
    let app = common::init_app!();

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let resp = test::call_service(&app, req).await;

    // Early rejections carry the headers too
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert!(resp.headers().contains_key("x-frame-options"));
    assert!(resp.headers().contains_key("referrer-policy"));
}

#[actix_web::test]
async fn test_openapi_document_served() {
    let app = common::init_app!();

    let req = test::TestRequest::get().uri("/api/openapi.json").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let json = json_body(resp).await;
    assert_eq!(json["info"]["title"], "Wallet Admin API");
    assert!(json["paths"]["/api/auth/register"].is_object());
}
