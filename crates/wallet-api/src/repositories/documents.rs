//! KYC document repository
//!
//! Every write that changes a document's existence or status recomputes the
//! owner's `kyc_status` in the same transaction.

use anyhow::{Context, Result};
use chrono::Utc;
use shared::models::KycDocument;
use shared::DbPool;
use sqlx::PgConnection;
use uuid::Uuid;

use super::ReviewOutcome;
use crate::models::{DocumentStatus, DocumentType, KycStatus};

/// Metadata of a file already written to storage
#[derive(Debug)]
pub struct NewDocument<'a> {
    pub user_id: &'a str,
    pub doc_type: DocumentType,
    pub filename: &'a str,
    pub original_name: &'a str,
    pub mime_type: &'a str,
    pub size_bytes: i64,
}

pub struct DocumentRepository;

impl DocumentRepository {
    pub async fn create(pool: &DbPool, new: &NewDocument<'_>) -> Result<KycDocument> {
        let mut tx = pool.begin().await.context("Failed to begin transaction")?;

        let doc = sqlx::query_as::<_, KycDocument>(
            r#"
            INSERT INTO kyc_documents (id, user_id, doc_type, filename, original_name, mime_type, size_bytes, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(new.user_id)
        .bind(new.doc_type.as_str())
        .bind(new.filename)
        .bind(new.original_name)
        .bind(new.mime_type)
        .bind(new.size_bytes)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .context("Failed to create document")?;

        Self::refresh_kyc_status(&mut *tx, new.user_id).await?;
        tx.commit().await.context("Failed to commit transaction")?;

        Ok(doc)
    }

    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<KycDocument>> {
        let doc = sqlx::query_as::<_, KycDocument>("SELECT * FROM kyc_documents WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("Failed to find document")?;

        Ok(doc)
    }

    /// Newest first
    pub async fn list_for_user(pool: &DbPool, user_id: &str) -> Result<Vec<KycDocument>> {
        let docs = sqlx::query_as::<_, KycDocument>(
            "SELECT * FROM kyc_documents WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to list documents")?;

        Ok(docs)
    }

    /// Stored file names for every document of a user
    pub async fn filenames_for_user(pool: &DbPool, user_id: &str) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT filename FROM kyc_documents WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to list document files")?;

        Ok(names)
    }

    /// Owner deletes one of their own pending documents
    ///
    /// A document owned by someone else is reported as not found.
    pub async fn delete_pending(
        pool: &DbPool,
        id: &str,
        user_id: &str,
    ) -> Result<ReviewOutcome<KycDocument>> {
        let mut tx = pool.begin().await.context("Failed to begin transaction")?;

        let doc = sqlx::query_as::<_, KycDocument>(
            "SELECT * FROM kyc_documents WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock document")?;

        let Some(doc) = doc else {
            return Ok(ReviewOutcome::NotFound);
        };
        if doc.status != DocumentStatus::Pending.as_str() {
            return Ok(ReviewOutcome::NotPending(doc.status));
        }

        sqlx::query("DELETE FROM kyc_documents WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete document")?;

        Self::refresh_kyc_status(&mut *tx, user_id).await?;
        tx.commit().await.context("Failed to commit transaction")?;

        Ok(ReviewOutcome::Done(doc))
    }

    /// Move a pending document to `verified` or `rejected`
    pub async fn review(
        pool: &DbPool,
        id: &str,
        reviewer_id: &str,
        decision: DocumentStatus,
    ) -> Result<ReviewOutcome<KycDocument>> {
        let mut tx = pool.begin().await.context("Failed to begin transaction")?;

        let current = sqlx::query_scalar::<_, String>(
            "SELECT status FROM kyc_documents WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock document")?;

        let Some(current) = current else {
            return Ok(ReviewOutcome::NotFound);
        };
        if current != DocumentStatus::Pending.as_str() {
            return Ok(ReviewOutcome::NotPending(current));
        }

        let doc = sqlx::query_as::<_, KycDocument>(
            r#"
            UPDATE kyc_documents
            SET status = $2, reviewed_by = $3, reviewed_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(decision.as_str())
        .bind(reviewer_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update document status")?;

        Self::refresh_kyc_status(&mut *tx, &doc.user_id).await?;
        tx.commit().await.context("Failed to commit transaction")?;

        Ok(ReviewOutcome::Done(doc))
    }

    /// Recompute and store a user's KYC status from their documents
    async fn refresh_kyc_status(conn: &mut PgConnection, user_id: &str) -> Result<KycStatus> {
        let statuses = sqlx::query_scalar::<_, String>(
            "SELECT status FROM kyc_documents WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to load document statuses")?;

        let kyc = KycStatus::derive(statuses.iter().filter_map(|s| s.parse().ok()));

        sqlx::query("UPDATE users SET kyc_status = $1, updated_at = $2 WHERE id = $3")
            .bind(kyc.as_str())
            .bind(Utc::now())
            .bind(user_id)
            .execute(&mut *conn)
            .await
            .context("Failed to update KYC status")?;

        tracing::debug!(user_id = %user_id, kyc_status = kyc.as_str(), "KYC status refreshed");

        Ok(kyc)
    }
}
