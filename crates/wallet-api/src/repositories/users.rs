//! User repository for database operations

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::models::User;
use shared::DbPool;
use uuid::Uuid;

use super::{contains_pattern, TransactionRepository};
use crate::models::{
    apply_balance_change, AccountType, AdjustmentType, AdminUpdateUserRequest, BalanceError,
    UpdateProfileRequest, UserRole,
};

/// Fields for a new account
#[derive(Debug)]
pub struct NewUser<'a> {
    pub title: Option<&'a str>,
    pub full_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: UserRole,
    pub phone: Option<&'a str>,
    pub dob: Option<NaiveDate>,
    pub address1: Option<&'a str>,
    pub address2: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub country: Option<&'a str>,
    pub account_type: AccountType,
}

/// Result of a direct balance adjustment
#[derive(Debug)]
pub enum BalanceOutcome {
    Adjusted(Decimal),
    NotFound,
    Rejected(BalanceError),
}

pub struct UserRepository;

impl UserRepository {
    /// Create a new user; email must already be normalised
    pub async fn create(pool: &DbPool, new: &NewUser<'_>) -> Result<User> {
        let user_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                id, title, full_name, email, password_hash, role, phone, dob,
                address1, address2, city, state, postal_code, country, account_type,
                balance, kyc_status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    0, 'not_submitted', $16, $16)
            RETURNING *
            "#,
        )
        .bind(&user_id)
        .bind(new.title)
        .bind(new.full_name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.role.as_str())
        .bind(new.phone)
        .bind(new.dob)
        .bind(new.address1)
        .bind(new.address2)
        .bind(new.city)
        .bind(new.state)
        .bind(new.postal_code)
        .bind(new.country)
        .bind(new.account_type.as_str())
        .bind(now)
        .fetch_one(pool)
        .await
        .context("Failed to create user")?;

        Ok(user)
    }

    pub async fn find_by_id(pool: &DbPool, user_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .context("Failed to find user by ID")?;

        Ok(user)
    }

    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .context("Failed to find user by email")?;

        Ok(user)
    }

    pub async fn email_exists(pool: &DbPool, email: &str) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await
                .context("Failed to check if email exists")?;

        Ok(exists)
    }

    /// True when another account already uses `email`
    pub async fn email_taken_by_other(pool: &DbPool, email: &str, user_id: &str) -> Result<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .context("Failed to check email ownership")?;

        Ok(taken)
    }

    pub async fn admin_exists(pool: &DbPool) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin')",
        )
        .fetch_one(pool)
        .await
        .context("Failed to check for an admin account")?;

        Ok(exists)
    }

    pub async fn update_last_login(pool: &DbPool, user_id: &str) -> Result<()> {
        sqlx::query("UPDATE users SET last_login_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(user_id)
            .execute(pool)
            .await
            .context("Failed to update last login")?;

        Ok(())
    }

    pub async fn update_password(pool: &DbPool, user_id: &str, password_hash: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $1, updated_at = $2 WHERE id = $3")
                .bind(password_hash)
                .bind(Utc::now())
                .bind(user_id)
                .execute(pool)
                .await
                .context("Failed to update password")?;

        Ok(result.rows_affected() > 0)
    }

    /// Apply a partial profile update; absent fields keep their value
    pub async fn update_profile(
        pool: &DbPool,
        user_id: &str,
        update: &UpdateProfileRequest,
    ) -> Result<Option<User>> {
        Self::update_fields(pool, user_id, update, None, None).await
    }

    /// Admin edit: profile fields plus email and account type
    ///
    /// `email` must already be normalised and checked for uniqueness.
    pub async fn admin_update(
        pool: &DbPool,
        user_id: &str,
        update: &AdminUpdateUserRequest,
        email: Option<&str>,
    ) -> Result<Option<User>> {
        Self::update_fields(
            pool,
            user_id,
            &update.profile,
            email,
            update.account_type.map(|t| t.as_str()),
        )
        .await
    }

    async fn update_fields(
        pool: &DbPool,
        user_id: &str,
        p: &UpdateProfileRequest,
        email: Option<&str>,
        account_type: Option<&str>,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                title        = COALESCE($2, title),
                full_name    = COALESCE($3, full_name),
                phone        = COALESCE($4, phone),
                dob          = COALESCE($5, dob),
                address1     = COALESCE($6, address1),
                address2     = COALESCE($7, address2),
                city         = COALESCE($8, city),
                state        = COALESCE($9, state),
                postal_code  = COALESCE($10, postal_code),
                country      = COALESCE($11, country),
                email        = COALESCE($12, email),
                account_type = COALESCE($13, account_type),
                updated_at   = $14
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(p.title.as_deref())
        .bind(p.full_name.as_deref())
        .bind(p.phone.as_deref())
        .bind(p.dob)
        .bind(p.address1.as_deref())
        .bind(p.address2.as_deref())
        .bind(p.city.as_deref())
        .bind(p.state.as_deref())
        .bind(p.postal_code.as_deref())
        .bind(p.country.as_deref())
        .bind(email)
        .bind(account_type)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
        .context("Failed to update user")?;

        Ok(user)
    }

    /// Customers (role `user`), newest first, optionally filtered by name or email
    pub async fn list_customers(
        pool: &DbPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>> {
        let pattern = search.map(contains_pattern);

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE role = 'user'
              AND ($1::text IS NULL OR full_name ILIKE $1 OR email ILIKE $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list users")?;

        Ok(users)
    }

    pub async fn count_customers(pool: &DbPool, search: Option<&str>) -> Result<i64> {
        let pattern = search.map(contains_pattern);

        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE role = 'user'
              AND ($1::text IS NULL OR full_name ILIKE $1 OR email ILIKE $1)
            "#,
        )
        .bind(pattern)
        .fetch_one(pool)
        .await
        .context("Failed to count users")?;

        Ok(count)
    }

    /// Delete an account; dependent rows go with it through FK cascades
    pub async fn delete(pool: &DbPool, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(pool)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected() > 0)
    }

    /// Credit or debit a balance directly and record it on the statement
    ///
    /// The user row is locked for the duration of the transaction.
    pub async fn adjust_balance(
        pool: &DbPool,
        user_id: &str,
        amount: Decimal,
        adjustment: AdjustmentType,
        description: Option<&str>,
    ) -> Result<BalanceOutcome> {
        let mut tx = pool.begin().await.context("Failed to begin transaction")?;

        let balance = sqlx::query_scalar::<_, Decimal>(
            "SELECT balance FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock user balance")?;

        let Some(balance) = balance else {
            return Ok(BalanceOutcome::NotFound);
        };

        let new_balance =
            match apply_balance_change(balance, amount, adjustment == AdjustmentType::Add) {
                Ok(b) => b,
                Err(e) => return Ok(BalanceOutcome::Rejected(e)),
            };

        sqlx::query("UPDATE users SET balance = $1, updated_at = $2 WHERE id = $3")
            .bind(new_balance)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to update balance")?;

        TransactionRepository::record(
            &mut *tx,
            user_id,
            adjustment.transaction_kind(),
            amount,
            new_balance,
            None,
            description.or(Some("Balance adjustment by administrator")),
        )
        .await?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(BalanceOutcome::Adjusted(new_balance))
    }
}
