//! Balance statement DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::PaginationMeta;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    /// deposit, withdrawal, adjustment_credit or adjustment_debit
    pub kind: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub balance_after: Decimal,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<shared::models::Transaction> for TransactionResponse {
    fn from(t: shared::models::Transaction) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            kind: t.kind,
            amount: t.amount,
            balance_after: t.balance_after,
            reference: t.reference,
            description: t.description,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionListResponse {
    pub success: bool,
    pub transactions: Vec<TransactionResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl TransactionListResponse {
    pub fn new(
        transactions: Vec<shared::models::Transaction>,
        pagination: Option<PaginationMeta>,
    ) -> Self {
        Self {
            success: true,
            transactions: transactions.into_iter().map(Into::into).collect(),
            pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_wire_format() {
        let tx = shared::models::Transaction {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            kind: "deposit".to_string(),
            amount: Decimal::new(2500, 2),
            balance_after: Decimal::new(12500, 2),
            reference: Some("r1".to_string()),
            description: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(TransactionListResponse::new(vec![tx], None)).unwrap();
        assert_eq!(json["transactions"][0]["_id"], "t1");
        assert_eq!(json["transactions"][0]["balanceAfter"], 125.0);
        assert!(json.get("pagination").is_none());
    }
}
