//! Admin console handlers
//!
//! Every route here sits behind [`crate::middleware::JwtAuth::admin`], so the
//! caller is already known to be an administrator. Handlers still read the
//! claims for the acting admin's ID in logs.

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use shared::DbPool;

use super::helpers::{
    bad_request, balance_error, email_exists, error_response, forbidden, handle_db_error,
    handle_write_error, internal_error, require_found, validate_request,
};
use crate::middleware::require_admin;
use crate::models::{
    is_admin_role, normalize_email, AdminStatsResponse, AdminUpdateUserRequest,
    BalanceAdjustmentRequest, BalanceResponse, DocumentResponse, ErrorResponse, MessageResponse,
    PaginationMeta, ResetPasswordRequest, TransactionListResponse,
    UserDetailResponse, UserEnvelope, UserListQuery, UserListResponse, UserResponse,
};
use crate::repositories::{
    BalanceOutcome, DocumentRepository, StatsRepository, TransactionRepository, UserRepository,
};
use crate::services::{passwords, DocumentStorage};

/// Most statement lines returned for one user
const USER_TRANSACTIONS_LIMIT: i64 = 100;

/// List customer accounts
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    params(UserListQuery),
    responses(
        (status = 200, description = "Customers", body = UserListResponse),
        (status = 400, description = "Invalid pagination", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    pool: web::Data<DbPool>,
    query: web::Query<UserListQuery>,
) -> impl Responder {
    let pagination = query.pagination();
    if let Err(msg) = pagination.validate() {
        return bad_request(&msg);
    }
    let search = query.search_term();

    let total = match handle_db_error(
        UserRepository::count_customers(&pool, search).await,
        "count users",
    ) {
        Ok(total) => total,
        Err(resp) => return resp,
    };

    let users = match handle_db_error(
        UserRepository::list_customers(&pool, search, pagination.limit, pagination.offset).await,
        "list users",
    ) {
        Ok(users) => users,
        Err(resp) => return resp,
    };

    HttpResponse::Ok().json(UserListResponse {
        success: true,
        users: users.into_iter().map(UserResponse::from).collect(),
        pagination: PaginationMeta::new(total, pagination.limit, pagination.offset),
    })
}

/// One account with its KYC documents
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User detail", body = UserDetailResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(pool: web::Data<DbPool>, path: web::Path<String>) -> impl Responder {
    let user = match require_found(UserRepository::find_by_id(&pool, &path).await, "User") {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let documents = match handle_db_error(
        DocumentRepository::list_for_user(&pool, &user.id).await,
        "list documents",
    ) {
        Ok(docs) => docs,
        Err(resp) => return resp,
    };

    HttpResponse::Ok().json(UserDetailResponse {
        success: true,
        user: UserResponse::from(user),
        documents: documents.into_iter().map(DocumentResponse::from).collect(),
    })
}

/// Edit profile fields, email and account type
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "User ID")),
    request_body = AdminUpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserEnvelope),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    pool: web::Data<DbPool>,
    req_http: HttpRequest,
    path: web::Path<String>,
    req: web::Json<AdminUpdateUserRequest>,
) -> impl Responder {
    let admin = match require_admin(&req_http) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let user_id = path.into_inner();

    if let Err(resp) = validate_request(&*req) {
        return resp;
    }

    let email = req.email.as_deref().map(normalize_email);
    if let Some(email) = &email {
        match handle_db_error(
            UserRepository::email_taken_by_other(&pool, email, &user_id).await,
            "update user",
        ) {
            Ok(false) => {}
            Ok(true) => return email_exists(),
            Err(resp) => return resp,
        }
    }

    // A concurrent update can still claim the email before this write lands
    let updated = match handle_write_error(
        UserRepository::admin_update(&pool, &user_id, &req, email.as_deref()).await,
        "update user",
        "User",
        Some(email_exists),
    ) {
        Ok(updated) => updated,
        Err(resp) => return resp,
    };

    match updated {
        Some(user) => {
            tracing::info!(admin_id = %admin.sub, user_id = %user.id, "User updated by admin");
            HttpResponse::Ok().json(UserEnvelope::new(user))
        }
        None => error_response(StatusCode::NOT_FOUND, "not_found", "User not found"),
    }
}

/// Credit or debit a balance directly
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/balance",
    tag = "Admin",
    params(("id" = String, Path, description = "User ID")),
    request_body = BalanceAdjustmentRequest,
    responses(
        (status = 200, description = "Balance adjusted", body = BalanceResponse),
        (status = 400, description = "Invalid amount or insufficient balance", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn adjust_balance(
    pool: web::Data<DbPool>,
    req_http: HttpRequest,
    path: web::Path<String>,
    req: web::Json<BalanceAdjustmentRequest>,
) -> impl Responder {
    let admin = match require_admin(&req_http) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let user_id = path.into_inner();

    if let Err(resp) = validate_request(&*req) {
        return resp;
    }

    let description = req
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let outcome = match handle_db_error(
        UserRepository::adjust_balance(&pool, &user_id, req.amount, req.adjustment, description)
            .await,
        "adjust balance",
    ) {
        Ok(outcome) => outcome,
        Err(resp) => return resp,
    };

    match outcome {
        BalanceOutcome::Adjusted(balance) => {
            tracing::info!(
                admin_id = %admin.sub,
                user_id = %user_id,
                kind = req.adjustment.transaction_kind(),
                amount = %req.amount,
                balance = %balance,
                "Balance adjusted by admin"
            );
            HttpResponse::Ok().json(BalanceResponse::new(balance))
        }
        BalanceOutcome::NotFound => {
            error_response(StatusCode::NOT_FOUND, "not_found", "User not found")
        }
        BalanceOutcome::Rejected(e) => balance_error(&e),
    }
}

/// Set a new password for an account
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/reset-password",
    tag = "Admin",
    params(("id" = String, Path, description = "User ID")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Password too short", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn reset_password(
    pool: web::Data<DbPool>,
    req_http: HttpRequest,
    path: web::Path<String>,
    req: web::Json<ResetPasswordRequest>,
) -> impl Responder {
    let admin = match require_admin(&req_http) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let user_id = path.into_inner();

    if let Err(resp) = validate_request(&*req) {
        return resp;
    }

    let password_hash = match passwords::hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => return internal_error("hash password", e),
    };

    match handle_db_error(
        UserRepository::update_password(&pool, &user_id, &password_hash).await,
        "reset password",
    ) {
        Ok(true) => {
            tracing::info!(admin_id = %admin.sub, user_id = %user_id, "Password reset by admin");
            HttpResponse::Ok().json(MessageResponse::new("Password reset successfully"))
        }
        Ok(false) => error_response(StatusCode::NOT_FOUND, "not_found", "User not found"),
        Err(resp) => resp,
    }
}

/// Delete a customer account and everything it owns
///
/// Rows go through FK cascades; stored files are removed afterwards on a
/// best-effort basis.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, description = "Admin accounts cannot be deleted", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    pool: web::Data<DbPool>,
    storage: web::Data<DocumentStorage>,
    req_http: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let admin = match require_admin(&req_http) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };

    let user = match require_found(UserRepository::find_by_id(&pool, &path).await, "User") {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    if is_admin_role(&user.role) {
        return forbidden("Admin accounts cannot be deleted");
    }

    let filenames = match handle_db_error(
        DocumentRepository::filenames_for_user(&pool, &user.id).await,
        "delete user",
    ) {
        Ok(names) => names,
        Err(resp) => return resp,
    };

    match handle_db_error(UserRepository::delete(&pool, &user.id).await, "delete user") {
        Ok(true) => {}
        Ok(false) => return error_response(StatusCode::NOT_FOUND, "not_found", "User not found"),
        Err(resp) => return resp,
    }

    for filename in &filenames {
        storage.remove(filename).await;
    }

    tracing::info!(
        admin_id = %admin.sub,
        user_id = %user.id,
        files_removed = filenames.len(),
        "User deleted by admin"
    );

    HttpResponse::Ok().json(MessageResponse::new("User deleted"))
}

/// Balance statement of one account, newest first
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}/transactions",
    tag = "Admin",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Statement lines", body = TransactionListResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn user_transactions(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> impl Responder {
    let user = match require_found(UserRepository::find_by_id(&pool, &path).await, "User") {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match handle_db_error(
        TransactionRepository::list_for_user(&pool, &user.id, USER_TRANSACTIONS_LIMIT, 0).await,
        "list transactions",
    ) {
        Ok(rows) => HttpResponse::Ok().json(TransactionListResponse::new(rows, None)),
        Err(resp) => resp,
    }
}

/// Dashboard counters
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "Admin",
    responses(
        (status = 200, description = "Dashboard counters", body = AdminStatsResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_stats(pool: web::Data<DbPool>) -> impl Responder {
    match handle_db_error(StatsRepository::admin_stats(&pool).await, "load statistics") {
        Ok(stats) => HttpResponse::Ok().json(AdminStatsResponse::from(stats)),
        Err(resp) => resp,
    }
}
