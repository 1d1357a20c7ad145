//! Money request repository
//!
//! Approval is the only path from a request to a balance change. It runs in
//! one transaction with both the request and the user row locked, so two
//! admins approving concurrently cannot double-apply or overdraw.

use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use shared::models::{MoneyRequest, MoneyRequestWithUser};
use shared::DbPool;
use uuid::Uuid;

use super::{ReviewOutcome, TransactionRepository};
use crate::models::{apply_balance_change, BalanceError, CreateMoneyRequest, RequestStatus, RequestType};

/// Result of an approval attempt
#[derive(Debug)]
pub enum ApprovalOutcome {
    Approved {
        request: MoneyRequest,
        balance: Decimal,
    },
    NotFound,
    NotPending(String),
    /// The balance change is out of range; the request stays pending
    BalanceRejected(BalanceError),
}

pub struct MoneyRequestRepository;

impl MoneyRequestRepository {
    pub async fn create(
        pool: &DbPool,
        user_id: &str,
        req: &CreateMoneyRequest,
    ) -> Result<MoneyRequest> {
        let now = Utc::now();

        let request = sqlx::query_as::<_, MoneyRequest>(
            r#"
            INSERT INTO money_requests (id, user_id, request_type, amount, method, note, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(req.request_type.as_str())
        .bind(req.amount)
        .bind(req.method.as_str())
        .bind(req.note.as_deref().map(str::trim).filter(|n| !n.is_empty()))
        .bind(now)
        .fetch_one(pool)
        .await
        .context("Failed to create money request")?;

        Ok(request)
    }

    /// Newest first
    pub async fn list_for_user(pool: &DbPool, user_id: &str) -> Result<Vec<MoneyRequest>> {
        let rows = sqlx::query_as::<_, MoneyRequest>(
            "SELECT * FROM money_requests WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to list money requests")?;

        Ok(rows)
    }

    /// All requests with the requester's identity, newest first
    pub async fn list_all(
        pool: &DbPool,
        status: Option<RequestStatus>,
    ) -> Result<Vec<MoneyRequestWithUser>> {
        let rows = sqlx::query_as::<_, MoneyRequestWithUser>(
            r#"
            SELECT mr.*, u.full_name AS user_full_name, u.email AS user_email
            FROM money_requests mr
            JOIN users u ON u.id = mr.user_id
            WHERE ($1::text IS NULL OR mr.status = $1)
            ORDER BY mr.created_at DESC
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await
        .context("Failed to list money requests")?;

        Ok(rows)
    }

    /// Approve a pending request and move the money
    pub async fn approve(
        pool: &DbPool,
        id: &str,
        admin_id: &str,
        admin_note: Option<&str>,
    ) -> Result<ApprovalOutcome> {
        let mut tx = pool.begin().await.context("Failed to begin transaction")?;

        let request = sqlx::query_as::<_, MoneyRequest>(
            "SELECT * FROM money_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock money request")?;

        let Some(request) = request else {
            return Ok(ApprovalOutcome::NotFound);
        };
        if request.status != RequestStatus::Pending.as_str() {
            return Ok(ApprovalOutcome::NotPending(request.status));
        }

        let request_type: RequestType = request
            .request_type
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Stored money request has an unknown type")?;

        let balance = sqlx::query_scalar::<_, Decimal>(
            "SELECT balance FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(&request.user_id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to lock user balance")?;

        let credit = request_type == RequestType::Deposit;
        let new_balance = match apply_balance_change(balance, request.amount, credit) {
            Ok(b) => b,
            Err(e) => return Ok(ApprovalOutcome::BalanceRejected(e)),
        };

        let now = Utc::now();

        sqlx::query("UPDATE users SET balance = $1, updated_at = $2 WHERE id = $3")
            .bind(new_balance)
            .bind(now)
            .bind(&request.user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to update balance")?;

        let updated = Self::set_status(&mut *tx, id, RequestStatus::Approved, admin_id, admin_note)
            .await?;

        let (kind, description) = match request_type {
            RequestType::Deposit => ("deposit", format!("Deposit via {}", request.method)),
            RequestType::Withdraw => ("withdrawal", format!("Withdrawal via {}", request.method)),
        };
        TransactionRepository::record(
            &mut *tx,
            &request.user_id,
            kind,
            request.amount,
            new_balance,
            Some(id),
            Some(&description),
        )
        .await?;

        tx.commit().await.context("Failed to commit transaction")?;

        tracing::info!(
            request_id = %id,
            user_id = %updated.user_id,
            admin_id = %admin_id,
            request_type = request_type.as_str(),
            amount = %updated.amount,
            balance = %new_balance,
            "Money request approved"
        );

        Ok(ApprovalOutcome::Approved {
            request: updated,
            balance: new_balance,
        })
    }

    /// Reject a pending request; the balance is untouched
    pub async fn reject(
        pool: &DbPool,
        id: &str,
        admin_id: &str,
        admin_note: Option<&str>,
    ) -> Result<ReviewOutcome<MoneyRequest>> {
        let mut tx = pool.begin().await.context("Failed to begin transaction")?;

        let status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM money_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock money request")?;

        let Some(status) = status else {
            return Ok(ReviewOutcome::NotFound);
        };
        if status != RequestStatus::Pending.as_str() {
            return Ok(ReviewOutcome::NotPending(status));
        }

        let updated =
            Self::set_status(&mut *tx, id, RequestStatus::Rejected, admin_id, admin_note).await?;
        tx.commit().await.context("Failed to commit transaction")?;

        Ok(ReviewOutcome::Done(updated))
    }

    async fn set_status(
        conn: &mut sqlx::PgConnection,
        id: &str,
        status: RequestStatus,
        admin_id: &str,
        admin_note: Option<&str>,
    ) -> Result<MoneyRequest> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, MoneyRequest>(
            r#"
            UPDATE money_requests
            SET status = $2, admin_note = COALESCE($3, admin_note),
                reviewed_by = $4, reviewed_at = $5, updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(admin_note)
        .bind(admin_id)
        .bind(now)
        .fetch_one(conn)
        .await
        .context("Failed to update money request status")?;

        Ok(row)
    }
}
