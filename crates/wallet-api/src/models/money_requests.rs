//! Deposit / withdraw request DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::validate_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestType {
    Deposit,
    Withdraw,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Deposit => "DEPOSIT",
            RequestType::Withdraw => "WITHDRAW",
        }
    }
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(RequestType::Deposit),
            "WITHDRAW" => Ok(RequestType::Withdraw),
            other => Err(format!("unknown request type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

/// Payment rail the user intends to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentMethod {
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Card")]
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Card",
        }
    }
}

/// Create a money request
///
/// `amount` accepts a JSON number or a numeric string.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"type": "DEPOSIT", "amount": "2500.00", "method": "Bank Transfer", "note": "Salary"}))]
pub struct CreateMoneyRequest {
    #[serde(rename = "type")]
    pub request_type: RequestType,

    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = f64)]
    pub amount: Decimal,

    pub method: PaymentMethod,

    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Admin decision body for approve / reject
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewMoneyRequest {
    #[validate(length(max = 500))]
    pub admin_note: Option<String>,
}

/// Admin listing filter
#[derive(Debug, Deserialize, IntoParams)]
pub struct MoneyRequestQuery {
    /// Only return requests in this status
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoneyRequestResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub method: String,
    pub note: Option<String>,
    pub status: String,
    pub admin_note: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Requester name, present on admin listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Requester email, present on admin listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<shared::models::MoneyRequest> for MoneyRequestResponse {
    fn from(r: shared::models::MoneyRequest) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            request_type: r.request_type,
            amount: r.amount,
            method: r.method,
            note: r.note,
            status: r.status,
            admin_note: r.admin_note,
            reviewed_by: r.reviewed_by,
            reviewed_at: r.reviewed_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
            full_name: None,
            email: None,
        }
    }
}

impl From<shared::models::MoneyRequestWithUser> for MoneyRequestResponse {
    fn from(r: shared::models::MoneyRequestWithUser) -> Self {
        let mut response = Self::from(r.request);
        response.full_name = Some(r.user_full_name);
        response.email = Some(r.user_email);
        response
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MoneyRequestEnvelope {
    pub success: bool,
    pub request: MoneyRequestResponse,
}

impl MoneyRequestEnvelope {
    pub fn new(request: impl Into<MoneyRequestResponse>) -> Self {
        Self {
            success: true,
            request: request.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MoneyRequestListResponse {
    pub success: bool,
    pub requests: Vec<MoneyRequestResponse>,
}

impl MoneyRequestListResponse {
    pub fn new<T: Into<MoneyRequestResponse>>(requests: Vec<T>) -> Self {
        Self {
            success: true,
            requests: requests.into_iter().map(Into::into).collect(),
        }
    }
}

/// Approval result: the updated request and the user's new balance
#[derive(Debug, Serialize, ToSchema)]
pub struct ApproveResponse {
    pub success: bool,
    pub request: MoneyRequestResponse,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub balance: Decimal,
}
