//! Common DTOs shared across multiple resources

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Largest amount accepted for a single request or adjustment
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Largest balance an account can hold, the ceiling of a `NUMERIC(14, 2)` column
pub const MAX_BALANCE: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, 2);

/// Standard error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Machine-readable error code
    pub error: String,
    /// Human-readable description
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

/// Success response carrying only a message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Pagination parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl PaginationParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit < 1 || self.limit > 100 {
            return Err("Limit must be between 1 and 100".to_string());
        }
        if self.offset < 0 {
            return Err("Offset must be non-negative".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(total: i64, limit: i64, offset: i64) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: offset + limit < total,
        }
    }
}

/// Amount validator shared by every money-carrying request
///
/// Accepts strictly positive values up to [`MAX_AMOUNT`] with at most two
/// decimal places.
pub fn validate_amount(amount: &Decimal) -> Result<(), validator::ValidationError> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(validator::ValidationError::new("amount_not_positive"));
    }
    if *amount > MAX_AMOUNT {
        return Err(validator::ValidationError::new("amount_too_large"));
    }
    if amount.normalize().scale() > 2 {
        return Err(validator::ValidationError::new("amount_precision"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_error_response_new() {
        let err = ErrorResponse::new("not_found", "User not found");
        assert!(!err.success);
        assert_eq!(err.error, "not_found");
        assert_eq!(err.message, "User not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_error_response_serialization() {
        let err = ErrorResponse::new("unauthorized", "Missing token");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Missing token");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_error_response_with_details() {
        let err = ErrorResponse::with_details(
            "insufficient_balance",
            "Balance too low",
            serde_json::json!({"balance": 10.0}),
        );
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["details"]["balance"], 10.0);
    }

    #[test]
    fn test_message_response() {
        let json = serde_json::to_value(MessageResponse::new("Password updated")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Password updated");
    }

    #[test]
    fn test_pagination_params_defaults() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.limit, 20);
        assert_eq!(params.offset, 0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_pagination_params_limit_bounds() {
        let too_low = PaginationParams { limit: 0, offset: 0 };
        assert!(too_low.validate().unwrap_err().contains("Limit"));

        let too_high = PaginationParams {
            limit: 101,
            offset: 0,
        };
        assert!(too_high.validate().is_err());
    }

    #[test]
    fn test_pagination_params_negative_offset() {
        let params = PaginationParams {
            limit: 20,
            offset: -1,
        };
        assert!(params.validate().unwrap_err().contains("Offset"));
    }

    #[test]
    fn test_pagination_meta_has_more() {
        assert!(PaginationMeta::new(100, 20, 0).has_more);
        assert!(!PaginationMeta::new(100, 20, 80).has_more);
        assert!(!PaginationMeta::new(0, 20, 0).has_more);
    }

    #[test]
    fn test_pagination_meta_camel_case() {
        let json = serde_json::to_string(&PaginationMeta::new(50, 10, 20)).unwrap();
        assert!(json.contains("\"hasMore\":true"));
    }

    #[test]
    fn test_max_balance_matches_column() {
        assert_eq!(MAX_BALANCE, Decimal::from_str("999999999999.99").unwrap());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(&Decimal::from_str("0.01").unwrap()).is_ok());
        assert!(validate_amount(&Decimal::from_str("2500.50").unwrap()).is_ok());
        assert!(validate_amount(&Decimal::from_str("10000000").unwrap()).is_ok());
        // trailing zeros beyond two places are still two-decimal values
        assert!(validate_amount(&Decimal::from_str("12.5000").unwrap()).is_ok());

        assert!(validate_amount(&Decimal::ZERO).is_err());
        assert!(validate_amount(&Decimal::from_str("-5").unwrap()).is_err());
        assert!(validate_amount(&Decimal::from_str("10000000.01").unwrap()).is_err());
        assert!(validate_amount(&Decimal::from_str("1.005").unwrap()).is_err());
    }
}
