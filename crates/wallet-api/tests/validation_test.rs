//! Request validation and extractor errors on the real route table
//!
//! Every request here is rejected before any database query runs.

mod common;

use actix_web::{http::StatusCode, test};
use common::{bearer, json_body, token_for};
use wallet_api::models::UserRole;
use wallet_api::services::LoginRateLimiter;

#[actix_web::test]
async fn test_register_invalid_email() {
    let app = common::init_app!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "fullName": "Jane Doe",
            "email": "not-an-email",
            "password": "s3cretpw"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = json_body(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "validation_error");
    assert!(json["details"]["email"].is_array());
}

#[actix_web::test]
async fn test_register_malformed_json() {
    let app = common::init_app!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"fullName\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = json_body(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "invalid_request");
}

#[actix_web::test]
async fn test_login_rate_limited_per_ip() {
    let app = common::init_app!(LoginRateLimiter::with_rates(600, 2));

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr("203.0.113.7:40000".parse().unwrap())
            .set_json(serde_json::json!({"email": "jane@example.com", "password": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            assert!(resp.headers().contains_key("retry-after"));
            assert_eq!(json_body(resp).await["error"], "rate_limited");
        }
        statuses.push(status);
    }

    assert_eq!(
        statuses,
        vec![
            StatusCode::BAD_REQUEST,
            StatusCode::BAD_REQUEST,
            StatusCode::TOO_MANY_REQUESTS
        ]
    );
}

#[actix_web::test]
async fn test_money_request_zero_amount() {
    let app = common::init_app!();
    let token = token_for("u1", UserRole::User);

    let req = test::TestRequest::post()
        .uri("/api/money-requests")
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({
            "type": "DEPOSIT",
            "amount": "0",
            "method": "Bank Transfer"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "validation_error");
}

#[actix_web::test]
async fn test_money_request_unknown_method() {
    let app = common::init_app!();
    let token = token_for("u1", UserRole::User);

    let req = test::TestRequest::post()
        .uri("/api/money-requests")
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({
            "type": "DEPOSIT",
            "amount": 50,
            "method": "Cheque"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "invalid_request");
}

#[actix_web::test]
async fn test_balance_adjustment_unknown_type() {
    let app = common::init_app!();
    let token = token_for("admin1", UserRole::Admin);

    let req = test::TestRequest::post()
        .uri("/api/admin/users/u1/balance")
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({"amount": 10, "type": "multiply"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_reset_password_too_short() {
    let app = common::init_app!();
    let token = token_for("admin1", UserRole::Admin);

    let req = test::TestRequest::post()
        .uri("/api/admin/users/u1/reset-password")
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({"password": "123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "validation_error");
}

#[actix_web::test]
async fn test_user_listing_limit_out_of_range() {
    let app = common::init_app!();
    let token = token_for("admin1", UserRole::Admin);

    let req = test::TestRequest::get()
        .uri("/api/admin/users?limit=500")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "bad_request");
}

#[actix_web::test]
async fn test_transactions_limit_zero() {
    let app = common::init_app!();
    let token = token_for("u1", UserRole::User);

    let req = test::TestRequest::get()
        .uri("/api/transactions/my?limit=0")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_upload_rejects_disallowed_extension() {
    let app = common::init_app!();
    let token = token_for("u1", UserRole::User);

    let req = test::TestRequest::post()
        .uri("/api/documents")
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({
            "type": "passport",
            "fileName": "passport.exe",
            "contentBase64": "TVqQAAMAAAAEAAAA"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "invalid_file");
}

#[actix_web::test]
async fn test_upload_rejects_unknown_document_type() {
    let app = common::init_app!();
    let token = token_for("u1", UserRole::User);

    let req = test::TestRequest::post()
        .uri("/api/documents")
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({
            "type": "library_card",
            "fileName": "card.png",
            "contentBase64": "iVBORw0KGgo="
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "invalid_request");
}

#[actix_web::test]
async fn test_investment_end_before_start() {
    let app = common::init_app!();
    let token = token_for("admin1", UserRole::Admin);

    let req = test::TestRequest::post()
        .uri("/api/admin/investments")
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({
            "userId": "u1",
            "planName": "Fixed 12M",
            "amount": 5000,
            "startDate": "2025-06-01",
            "endDate": "2025-01-01"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_upload_path_traversal_rejected() {
    let app = common::init_app!();

    let req = test::TestRequest::get()
        .uri("/uploads/kyc/..secret.pdf")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
