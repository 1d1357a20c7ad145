//! Authentication DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::AccountType;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Register request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"fullName": "Jane Doe", "email": "jane@example.com", "password": "s3cretpw", "phone": "+61 400 000 000"}))]
pub struct RegisterRequest {
    #[validate(length(max = 20))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub full_name: String,

    #[validate(email, length(max = 254))]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    pub dob: Option<NaiveDate>,

    #[validate(length(max = 200))]
    pub address1: Option<String>,

    #[validate(length(max = 200))]
    pub address2: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 100))]
    pub state: Option<String>,

    #[validate(length(max = 20))]
    pub postal_code: Option<String>,

    #[validate(length(max = 100))]
    pub country: Option<String>,

    pub account_type: Option<AccountType>,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"email": "jane@example.com", "password": "s3cretpw"}))]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Change own password
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,

    #[validate(length(min = 6, max = 128))]
    pub new_password: String,
}

/// Authentication response with JWT token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserResponse,
}

/// Single user envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub success: bool,
    pub user: UserResponse,
}

impl UserEnvelope {
    pub fn new(user: shared::models::User) -> Self {
        Self {
            success: true,
            user: UserResponse::from(user),
        }
    }
}

/// User response (safe for API, without password)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Option<String>,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub dob: Option<NaiveDate>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub account_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub balance: Decimal,
    pub kyc_status: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<shared::models::User> for UserResponse {
    fn from(user: shared::models::User) -> Self {
        Self {
            id: user.id,
            title: user.title,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            dob: user.dob,
            address1: user.address1,
            address2: user.address2,
            city: user.city,
            state: user.state,
            postal_code: user.postal_code,
            country: user.country,
            account_type: user.account_type,
            balance: user.balance,
            kyc_status: user.kyc_status,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // Subject (user_id)
    pub email: String, // Email for log context
    pub role: UserRole,
    pub exp: i64, // Expiration time (as UTC timestamp)
    pub iat: i64, // Issued at (as UTC timestamp)
}

impl Claims {
    pub fn new(user_id: String, email: String, role: UserRole, expiration_hours: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        let exp = now + (expiration_hours * 3600);

        Self {
            sub: user_id,
            email,
            role,
            exp,
            iat: now,
        }
    }
}

/// Normalise an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
