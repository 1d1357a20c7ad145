//! Investment repository

use anyhow::{Context, Result};
use chrono::Utc;
use shared::models::Investment;
use shared::DbPool;
use uuid::Uuid;

use crate::models::{CreateInvestmentRequest, UpdateInvestmentRequest};

pub struct InvestmentRepository;

impl InvestmentRepository {
    pub async fn create(pool: &DbPool, req: &CreateInvestmentRequest) -> Result<Investment> {
        let now = Utc::now();

        let investment = sqlx::query_as::<_, Investment>(
            r#"
            INSERT INTO investments (id, user_id, plan_name, amount, expected_return, status,
                                     start_date, end_date, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&req.user_id)
        .bind(req.plan_name.trim())
        .bind(req.amount)
        .bind(req.expected_return)
        .bind(req.status.as_str())
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.notes.as_deref())
        .bind(now)
        .fetch_one(pool)
        .await
        .context("Failed to create investment")?;

        Ok(investment)
    }

    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<Investment>> {
        let investment = sqlx::query_as::<_, Investment>("SELECT * FROM investments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("Failed to find investment")?;

        Ok(investment)
    }

    /// Newest first, optionally for one user
    pub async fn list(pool: &DbPool, user_id: Option<&str>) -> Result<Vec<Investment>> {
        let rows = sqlx::query_as::<_, Investment>(
            r#"
            SELECT * FROM investments
            WHERE ($1::text IS NULL OR user_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to list investments")?;

        Ok(rows)
    }

    pub async fn update(
        pool: &DbPool,
        id: &str,
        req: &UpdateInvestmentRequest,
    ) -> Result<Option<Investment>> {
        let investment = sqlx::query_as::<_, Investment>(
            r#"
            UPDATE investments SET
                plan_name       = COALESCE($2, plan_name),
                amount          = COALESCE($3, amount),
                expected_return = COALESCE($4, expected_return),
                status          = COALESCE($5, status),
                start_date      = COALESCE($6, start_date),
                end_date        = COALESCE($7, end_date),
                notes           = COALESCE($8, notes),
                updated_at      = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(req.plan_name.as_deref().map(str::trim))
        .bind(req.amount)
        .bind(req.expected_return)
        .bind(req.status.map(|s| s.as_str()))
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.notes.as_deref())
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
        .context("Failed to update investment")?;

        Ok(investment)
    }

    pub async fn delete(pool: &DbPool, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM investments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("Failed to delete investment")?;

        Ok(result.rows_affected() > 0)
    }
}
