//! Admin console DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::auth::{UserResponse, UserRole};
use super::common::{validate_amount, PaginationMeta, MAX_BALANCE};
use super::documents::DocumentResponse;

/// Direction of a direct balance adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentType {
    Add,
    Subtract,
}

impl AdjustmentType {
    /// Transaction kind recorded for this adjustment
    pub fn transaction_kind(&self) -> &'static str {
        match self {
            AdjustmentType::Add => "adjustment_credit",
            AdjustmentType::Subtract => "adjustment_debit",
        }
    }
}

/// Why a balance change cannot be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    Insufficient { balance: Decimal, requested: Decimal },
    /// The credit would push the balance past [`MAX_BALANCE`]
    LimitExceeded { balance: Decimal, requested: Decimal },
}

impl BalanceError {
    pub fn code(&self) -> &'static str {
        match self {
            BalanceError::Insufficient { .. } => "insufficient_balance",
            BalanceError::LimitExceeded { .. } => "balance_limit_exceeded",
        }
    }

    /// Balance at the time of the attempt and the amount asked for
    pub fn amounts(&self) -> (Decimal, Decimal) {
        match self {
            BalanceError::Insufficient { balance, requested }
            | BalanceError::LimitExceeded { balance, requested } => (*balance, *requested),
        }
    }
}

impl std::fmt::Display for BalanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceError::Insufficient { balance, requested } => write!(
                f,
                "Insufficient balance: {} available, {} requested",
                balance, requested
            ),
            BalanceError::LimitExceeded { balance, requested } => write!(
                f,
                "Balance limit exceeded: {} held, {} requested, {} allowed",
                balance, requested, MAX_BALANCE
            ),
        }
    }
}

/// Apply a credit or debit to a balance
///
/// The result stays within `0..=MAX_BALANCE`.
pub fn apply_balance_change(
    balance: Decimal,
    amount: Decimal,
    credit: bool,
) -> Result<Decimal, BalanceError> {
    if credit {
        return match balance.checked_add(amount) {
            Some(total) if total <= MAX_BALANCE => Ok(total),
            _ => Err(BalanceError::LimitExceeded {
                balance,
                requested: amount,
            }),
        };
    }
    if amount > balance {
        return Err(BalanceError::Insufficient {
            balance,
            requested: amount,
        });
    }
    Ok(balance - amount)
}

/// Direct balance adjustment by an administrator
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"amount": 150, "type": "add"}))]
pub struct BalanceAdjustmentRequest {
    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = f64)]
    pub amount: Decimal,

    #[serde(rename = "type")]
    pub adjustment: AdjustmentType,

    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub success: bool,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub balance: Decimal,
}

impl BalanceResponse {
    pub fn new(balance: Decimal) -> Self {
        Self {
            success: true,
            balance,
        }
    }
}

/// Password set by an administrator
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Customer listing query
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserListQuery {
    /// Case-insensitive match on name or email
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl UserListQuery {
    pub fn pagination(&self) -> super::common::PaginationParams {
        super::common::PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }

    /// Trimmed search term, `None` when blank
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub success: bool,
    pub users: Vec<UserResponse>,
    pub pagination: PaginationMeta,
}

/// Single customer with their KYC documents
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDetailResponse {
    pub success: bool,
    pub user: UserResponse,
    pub documents: Vec<DocumentResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub success: bool,
    pub total_users: i64,
    pub pending_documents: i64,
    pub pending_money_requests: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_balance: Decimal,
}

impl From<shared::models::AdminStats> for AdminStatsResponse {
    fn from(stats: shared::models::AdminStats) -> Self {
        Self {
            success: true,
            total_users: stats.total_users,
            pending_documents: stats.pending_documents,
            pending_money_requests: stats.pending_money_requests,
            total_balance: stats.total_balance,
        }
    }
}

/// True when the stored role string names an administrator
pub fn is_admin_role(role: &str) -> bool {
    role.parse::<UserRole>().map(|r| r.is_admin()).unwrap_or(false)
}
