//! Data models matching the PostgreSQL database schema
//!
//! Status and kind columns are stored as TEXT; the typed enums that give them
//! meaning live next to the API DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User account (both customers and administrators)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub title: Option<String>,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// 'user' or 'admin'
    pub role: String,
    pub phone: Option<String>,
    pub dob: Option<NaiveDate>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    /// 'personal' or 'business'
    pub account_type: String,
    pub balance: Decimal,
    /// 'not_submitted', 'pending', 'verified' or 'rejected'
    pub kyc_status: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Uploaded KYC document
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KycDocument {
    pub id: String,
    pub user_id: String,
    pub doc_type: String,
    /// Stored file name under `<uploads>/kyc/`
    pub filename: String,
    /// Name the file was uploaded with
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    /// 'pending', 'verified' or 'rejected'
    pub status: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Deposit or withdraw request awaiting admin review
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoneyRequest {
    pub id: String,
    pub user_id: String,
    /// 'DEPOSIT' or 'WITHDRAW'
    pub request_type: String,
    pub amount: Decimal,
    pub method: String,
    pub note: Option<String>,
    /// 'pending', 'approved' or 'rejected'
    pub status: String,
    pub admin_note: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Money request joined with the requesting user's identity (admin listing)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoneyRequestWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: MoneyRequest,
    pub user_full_name: String,
    pub user_email: String,
}

/// Investment record maintained by administrators
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Investment {
    pub id: String,
    pub user_id: String,
    pub plan_name: String,
    pub amount: Decimal,
    /// Expected return in percent
    pub expected_return: Decimal,
    /// 'active', 'completed' or 'cancelled'
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Balance movement shown on the user's statement
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    /// 'deposit', 'withdrawal', 'adjustment_credit' or 'adjustment_debit'
    pub kind: String,
    pub amount: Decimal,
    pub balance_after: Decimal,
    /// Money request ID for request-driven movements
    pub reference: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Dashboard counters for the admin console
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminStats {
    pub total_users: i64,
    pub pending_documents: i64,
    pub pending_money_requests: i64,
    pub total_balance: Decimal,
}
