//! Balance statement repository

use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use shared::models::Transaction;
use shared::DbPool;
use sqlx::PgConnection;
use uuid::Uuid;

pub struct TransactionRepository;

impl TransactionRepository {
    /// Append a statement line inside the caller's database transaction
    pub async fn record(
        conn: &mut PgConnection,
        user_id: &str,
        kind: &str,
        amount: Decimal,
        balance_after: Decimal,
        reference: Option<&str>,
        description: Option<&str>,
    ) -> Result<Transaction> {
        let row = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (id, user_id, kind, amount, balance_after, reference, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(kind)
        .bind(amount)
        .bind(balance_after)
        .bind(reference)
        .bind(description)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
        .context("Failed to record transaction")?;

        Ok(row)
    }

    /// Newest first
    pub async fn list_for_user(
        pool: &DbPool,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list transactions")?;

        Ok(rows)
    }

    pub async fn count_for_user(pool: &DbPool, user_id: &str) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transactions WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await
                .context("Failed to count transactions")?;

        Ok(count)
    }
}
