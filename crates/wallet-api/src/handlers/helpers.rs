//! Common handler helpers
//!
//! Every helper returns `Result<T, HttpResponse>` so handlers can bail out with
//! a ready-made error body:
//!
//! ```ignore
//! let user = match require_found(UserRepository::find_by_id(&pool, &id).await, "User") {
//!     Ok(u) => u,
//!     Err(resp) => return resp,
//! };
//! ```

use actix_web::{error::InternalError, http::StatusCode, HttpRequest, HttpResponse};
use rust_decimal::prelude::ToPrimitive;
use sqlx::error::ErrorKind;
use validator::{Validate, ValidationErrors};

use crate::models::{BalanceError, ErrorResponse};

/// Validate a request struct or return 400 with per-field details
pub fn validate_request<T: Validate>(req: &T) -> Result<(), HttpResponse> {
    req.validate().map_err(|e| {
        HttpResponse::BadRequest().json(ErrorResponse::with_details(
            "validation_error",
            format!("Validation failed: {}", summarize(&e)),
            validation_details(&e),
        ))
    })
}

/// Field name to list of failed rule codes
fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let fields: serde_json::Map<String, serde_json::Value> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let codes = errs
                .iter()
                .map(|e| serde_json::Value::String(e.code.to_string()))
                .collect();
            (field.to_string(), serde_json::Value::Array(codes))
        })
        .collect();
    serde_json::Value::Object(fields)
}

fn summarize(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|k| k.to_string())
        .collect();
    fields.sort();
    if fields.is_empty() {
        errors.to_string()
    } else {
        format!("invalid {}", fields.join(", "))
    }
}

/// Log a database error and return 500 without leaking details
pub fn handle_db_error<T, E: std::fmt::Display>(
    result: Result<T, E>,
    context: &str,
) -> Result<T, HttpResponse> {
    result.map_err(|e| {
        tracing::error!("Database error during {}: {:#}", context, e);
        HttpResponse::InternalServerError().json(ErrorResponse::new(
            "internal_error",
            format!("Failed to {}", context),
        ))
    })
}

/// Like [`handle_db_error`] for writes that reference other rows
///
/// A foreign key violation means a referenced row disappeared (typically the
/// account behind a still-valid token) and becomes 404 for `resource`. A
/// unique violation becomes the `on_duplicate` response when one is given.
pub fn handle_write_error<T>(
    result: anyhow::Result<T>,
    context: &str,
    resource: &str,
    on_duplicate: Option<fn() -> HttpResponse>,
) -> Result<T, HttpResponse> {
    let err = match result {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    match constraint_violation(&err) {
        Some(ErrorKind::ForeignKeyViolation) => {
            tracing::warn!("Referenced row missing during {}: {:#}", context, err);
            Err(error_response(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{} not found", resource),
            ))
        }
        Some(ErrorKind::UniqueViolation) => match on_duplicate {
            Some(respond) => {
                tracing::info!("Duplicate rejected during {}: {:#}", context, err);
                Err(respond())
            }
            None => handle_db_error(Err(err), context),
        },
        _ => handle_db_error(Err(err), context),
    }
}

/// Constraint class of a failed statement, if the database reported one
fn constraint_violation(err: &anyhow::Error) -> Option<ErrorKind> {
    match err.downcast_ref::<sqlx::Error>()? {
        sqlx::Error::Database(db) => Some(db.kind()),
        _ => None,
    }
}

/// 409 for an email another account already uses
pub fn email_exists() -> HttpResponse {
    conflict("email_exists", "Email already registered")
}

/// Convert a lookup result to its value or 404 (500 on database error)
pub fn require_found<T, E: std::fmt::Display>(
    result: Result<Option<T>, E>,
    resource: &str,
) -> Result<T, HttpResponse> {
    handle_db_error(result, &format!("load {}", resource.to_lowercase()))?.ok_or_else(|| {
        HttpResponse::NotFound().json(ErrorResponse::new(
            "not_found",
            format!("{} not found", resource),
        ))
    })
}

pub fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(error, message))
}

pub fn bad_request(message: &str) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, "bad_request", message)
}

pub fn forbidden(message: &str) -> HttpResponse {
    error_response(StatusCode::FORBIDDEN, "forbidden", message)
}

pub fn conflict(error: &str, message: &str) -> HttpResponse {
    error_response(StatusCode::CONFLICT, error, message)
}

/// 409 for a status change attempted on a record that is no longer pending
pub fn invalid_status(resource: &str, current: &str) -> HttpResponse {
    error_response(
        StatusCode::CONFLICT,
        "invalid_status",
        format!("{} is already {}", resource, current),
    )
}

/// 400 for a balance change that would leave the allowed range
pub fn balance_error(err: &BalanceError) -> HttpResponse {
    let (balance, requested) = err.amounts();
    HttpResponse::BadRequest().json(ErrorResponse::with_details(
        err.code(),
        err.to_string(),
        serde_json::json!({
            "balance": balance.to_f64(),
            "requested": requested.to_f64(),
        }),
    ))
}

/// Generic 500 for non-database failures
pub fn internal_error(context: &str, error: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("Error during {}: {}", context, error);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "An internal error occurred. Please try again later.",
    )
}

/// Body for malformed JSON, query strings and path segments
pub fn extractor_error(err: impl std::fmt::Display, _req: &HttpRequest) -> actix_web::Error {
    let response = error_response(StatusCode::BAD_REQUEST, "invalid_request", err.to_string());
    InternalError::from_response(err.to_string(), response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3))]
        name: String,
    }

    async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_validate_request_details() {
        let resp = validate_request(&Sample {
            name: "ab".to_string(),
        })
        .unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["details"]["name"][0], "length");
        assert_eq!(json["message"], "Validation failed: invalid name");
    }

    #[actix_web::test]
    async fn test_require_found() {
        let found: Result<Option<i32>, String> = Ok(Some(7));
        assert_eq!(require_found(found, "User").unwrap(), 7);

        let missing: Result<Option<i32>, String> = Ok(None);
        let resp = require_found(missing, "User").unwrap_err();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["message"], "User not found");

        let failed: Result<Option<i32>, String> = Err("connection reset".to_string());
        let resp = require_found(failed, "User").unwrap_err();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert!(!json["message"].as_str().unwrap().contains("connection reset"));
    }

    #[actix_web::test]
    async fn test_invalid_status() {
        let resp = invalid_status("Money request", "approved");
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "invalid_status");
        assert_eq!(json["message"], "Money request is already approved");
    }

    #[actix_web::test]
    async fn test_balance_error_details() {
        let err = BalanceError::Insufficient {
            balance: rust_decimal::Decimal::new(5000, 2),
            requested: rust_decimal::Decimal::new(7525, 2),
        };
        let resp = balance_error(&err);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "insufficient_balance");
        assert_eq!(json["details"]["balance"], 50.0);
        assert_eq!(json["details"]["requested"], 75.25);
    }

    #[actix_web::test]
    async fn test_balance_error_limit() {
        let err = BalanceError::LimitExceeded {
            balance: crate::models::MAX_BALANCE,
            requested: rust_decimal::Decimal::ONE,
        };
        let resp = balance_error(&err);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "balance_limit_exceeded");
    }

    #[actix_web::test]
    async fn test_handle_write_error_passes_through() {
        assert_eq!(
            handle_write_error(Ok(3), "save", "User", Some(email_exists)).unwrap(),
            3
        );

        let resp = handle_write_error::<()>(
            Err(anyhow::anyhow!("pool timed out")),
            "create user",
            "User",
            Some(email_exists),
        )
        .unwrap_err();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["message"], "Failed to create user");
    }

    #[actix_web::test]
    async fn test_email_exists_conflict() {
        let resp = email_exists();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(resp).await["error"], "email_exists");
    }
}
