//! Admin dashboard counters

use anyhow::{Context, Result};
use shared::models::AdminStats;
use shared::DbPool;

pub struct StatsRepository;

impl StatsRepository {
    pub async fn admin_stats(pool: &DbPool) -> Result<AdminStats> {
        let stats = sqlx::query_as::<_, AdminStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users WHERE role = 'user') AS total_users,
                (SELECT COUNT(*) FROM kyc_documents WHERE status = 'pending') AS pending_documents,
                (SELECT COUNT(*) FROM money_requests WHERE status = 'pending') AS pending_money_requests,
                (SELECT COALESCE(SUM(balance), 0) FROM users WHERE role = 'user') AS total_balance
            "#,
        )
        .fetch_one(pool)
        .await
        .context("Failed to load admin stats")?;

        Ok(stats)
    }
}
