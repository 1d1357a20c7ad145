//! Investment DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::common::validate_amount;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl InvestmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentStatus::Active => "active",
            InvestmentStatus::Completed => "completed",
            InvestmentStatus::Cancelled => "cancelled",
        }
    }
}

/// Expected return is a percentage in [-100, 1000] with two decimals
fn validate_expected_return(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::from(-100) || *value > Decimal::from(1000) {
        return Err(ValidationError::new("expected_return_range"));
    }
    if value.normalize().scale() > 2 {
        return Err(ValidationError::new("expected_return_precision"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"userId": "0b6f...", "planName": "Fixed 12M", "amount": 5000, "expectedReturn": 7.5, "startDate": "2025-01-01"}))]
pub struct CreateInvestmentRequest {
    #[validate(length(min = 1))]
    pub user_id: String,

    #[validate(length(min = 1, max = 100))]
    pub plan_name: String,

    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = f64)]
    pub amount: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validate_expected_return"))]
    #[schema(value_type = f64)]
    pub expected_return: Decimal,

    #[serde(default)]
    pub status: InvestmentStatus,

    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl CreateInvestmentRequest {
    /// End date, when present, must not precede the start date
    pub fn dates_are_ordered(&self) -> bool {
        self.end_date.map_or(true, |end| end >= self.start_date)
    }
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvestmentRequest {
    #[validate(length(min = 1, max = 100))]
    pub plan_name: Option<String>,

    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Decimal>,

    #[validate(custom(function = "validate_expected_return"))]
    #[schema(value_type = Option<f64>)]
    pub expected_return: Option<Decimal>,

    pub status: Option<InvestmentStatus>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentQuery {
    /// Only investments belonging to this user
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub plan_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub expected_return: Decimal,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<shared::models::Investment> for InvestmentResponse {
    fn from(i: shared::models::Investment) -> Self {
        Self {
            id: i.id,
            user_id: i.user_id,
            plan_name: i.plan_name,
            amount: i.amount,
            expected_return: i.expected_return,
            status: i.status,
            start_date: i.start_date,
            end_date: i.end_date,
            notes: i.notes,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvestmentEnvelope {
    pub success: bool,
    pub investment: InvestmentResponse,
}

impl InvestmentEnvelope {
    pub fn new(investment: shared::models::Investment) -> Self {
        Self {
            success: true,
            investment: investment.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvestmentListResponse {
    pub success: bool,
    pub investments: Vec<InvestmentResponse>,
}

impl InvestmentListResponse {
    pub fn new(investments: Vec<shared::models::Investment>) -> Self {
        Self {
            success: true,
            investments: investments.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateInvestmentRequest {
        serde_json::from_value(serde_json::json!({
            "userId": "u1",
            "planName": "Fixed 12M",
            "amount": 5000,
            "expectedReturn": 7.5,
            "startDate": "2025-01-01"
        }))
        .unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let req = create_request();
        assert!(req.validate().is_ok());
        assert_eq!(req.status, InvestmentStatus::Active);
        assert!(req.dates_are_ordered());
    }

    #[test]
    fn test_create_end_before_start() {
        let mut req = create_request();
        req.end_date = NaiveDate::from_ymd_opt(2024, 12, 31);
        assert!(!req.dates_are_ordered());
    }

    #[test]
    fn test_expected_return_bounds() {
        let mut req = create_request();
        req.expected_return = Decimal::from(1001);
        assert!(req.validate().is_err());

        req.expected_return = Decimal::new(-5, 0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_partial() {
        let req: UpdateInvestmentRequest =
            serde_json::from_value(serde_json::json!({"status": "completed"})).unwrap();
        assert_eq!(req.status, Some(InvestmentStatus::Completed));
        assert!(req.amount.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_rejects_bad_amount() {
        let req = UpdateInvestmentRequest {
            amount: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
