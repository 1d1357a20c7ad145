//! User profile DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

/// Account type chosen at registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Personal,
    Business,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Personal => "personal",
            AccountType::Business => "business",
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(AccountType::Personal),
            "business" => Ok(AccountType::Business),
            other => Err(format!("unknown account type '{}'", other)),
        }
    }
}

/// Profile fields a user may edit on their own account
///
/// Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 20))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,

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
}

/// Admin edit of a customer account
///
/// Same as [`UpdateProfileRequest`] plus the fields only an administrator
/// may change.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUserRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: UpdateProfileRequest,

    #[validate(email, length(max = 254))]
    pub email: Option<String>,

    pub account_type: Option<AccountType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_parse() {
        assert_eq!("business".parse::<AccountType>(), Ok(AccountType::Business));
        assert_eq!(AccountType::default().as_str(), "personal");
        assert!("corporate".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_update_profile_partial() {
        let req: UpdateProfileRequest = serde_json::from_value(serde_json::json!({
            "city": "Sydney",
            "postalCode": "2000"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.full_name.is_none());
        assert_eq!(req.city.as_deref(), Some("Sydney"));
    }

    #[test]
    fn test_update_profile_ignores_protected_fields() {
        let req: UpdateProfileRequest = serde_json::from_value(serde_json::json!({
            "fullName": "Jane Roe",
            "balance": 1000000,
            "role": "admin"
        }))
        .unwrap();
        assert_eq!(req.full_name.as_deref(), Some("Jane Roe"));
    }

    #[test]
    fn test_update_profile_empty_name_rejected() {
        let req = UpdateProfileRequest {
            full_name: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_admin_update_flattens_profile() {
        let req: AdminUpdateUserRequest = serde_json::from_value(serde_json::json!({
            "fullName": "Jane Roe",
            "email": "jane.roe@example.com",
            "accountType": "business"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.profile.full_name.as_deref(), Some("Jane Roe"));
        assert_eq!(req.account_type, Some(AccountType::Business));
    }

    #[test]
    fn test_admin_update_invalid_email() {
        let req = AdminUpdateUserRequest {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
