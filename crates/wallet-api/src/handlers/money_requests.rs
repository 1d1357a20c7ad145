//! Deposit and withdraw request handlers

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use shared::DbPool;

use super::helpers::{
    balance_error, error_response, handle_db_error, handle_write_error, invalid_status,
    require_found, validate_request,
};
use crate::middleware::{get_user_id, require_admin, require_customer};
use crate::models::{
    apply_balance_change, ApproveResponse, CreateMoneyRequest, ErrorResponse, MoneyRequestEnvelope,
    MoneyRequestListResponse, MoneyRequestQuery, MoneyRequestResponse, RequestType,
    ReviewMoneyRequest,
};
use crate::repositories::{ApprovalOutcome, MoneyRequestRepository, ReviewOutcome, UserRepository};

/// Validated admin note from an optional review body
fn review_note(body: &Option<web::Json<ReviewMoneyRequest>>) -> Result<Option<&str>, HttpResponse> {
    let Some(body) = body else {
        return Ok(None);
    };
    validate_request(&**body)?;
    Ok(body
        .admin_note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty()))
}

/// Create a deposit or withdraw request
///
/// Withdrawals larger than the current balance are refused up front. The
/// balance is checked again when the request is approved.
#[utoipa::path(
    post,
    path = "/api/money-requests",
    tag = "Money Requests",
    request_body = CreateMoneyRequest,
    responses(
        (status = 201, description = "Request created", body = MoneyRequestEnvelope),
        (status = 400, description = "Validation failed or insufficient balance", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Admins cannot create requests", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_money_request(
    pool: web::Data<DbPool>,
    req_http: HttpRequest,
    req: web::Json<CreateMoneyRequest>,
) -> impl Responder {
    let claims = match require_customer(&req_http) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };

    if let Err(resp) = validate_request(&*req) {
        return resp;
    }

    // The token may outlive its account
    let user = match require_found(UserRepository::find_by_id(&pool, &claims.sub).await, "User") {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    if req.request_type == RequestType::Withdraw {
        if let Err(e) = apply_balance_change(user.balance, req.amount, false) {
            return balance_error(&e);
        }
    }

    let request = match handle_write_error(
        MoneyRequestRepository::create(&pool, &claims.sub, &req).await,
        "create money request",
        "User",
        None,
    ) {
        Ok(request) => request,
        Err(resp) => return resp,
    };

    tracing::info!(
        user_id = %claims.sub,
        request_id = %request.id,
        request_type = req.request_type.as_str(),
        amount = %req.amount,
        "Money request created"
    );

    HttpResponse::Created().json(MoneyRequestEnvelope::new(request))
}

/// Own requests, newest first
#[utoipa::path(
    get,
    path = "/api/money-requests/my",
    tag = "Money Requests",
    responses(
        (status = 200, description = "Own requests", body = MoneyRequestListResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_money_requests(pool: web::Data<DbPool>, req_http: HttpRequest) -> impl Responder {
    let user_id = match get_user_id(&req_http) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match handle_db_error(
        MoneyRequestRepository::list_for_user(&pool, &user_id).await,
        "list money requests",
    ) {
        Ok(rows) => HttpResponse::Ok().json(MoneyRequestListResponse::new(rows)),
        Err(resp) => resp,
    }
}

/// All requests with the requester's name and email (admin)
#[utoipa::path(
    get,
    path = "/api/money-requests",
    tag = "Money Requests",
    params(MoneyRequestQuery),
    responses(
        (status = 200, description = "Requests", body = MoneyRequestListResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_money_requests(
    pool: web::Data<DbPool>,
    req_http: HttpRequest,
    query: web::Query<MoneyRequestQuery>,
) -> impl Responder {
    if let Err(resp) = require_admin(&req_http) {
        return resp;
    }

    match handle_db_error(
        MoneyRequestRepository::list_all(&pool, query.status).await,
        "list money requests",
    ) {
        Ok(rows) => HttpResponse::Ok().json(MoneyRequestListResponse::new(rows)),
        Err(resp) => resp,
    }
}

/// Approve a pending request and apply it to the balance (admin)
#[utoipa::path(
    post,
    path = "/api/money-requests/{id}/approve",
    tag = "Money Requests",
    params(("id" = String, Path, description = "Money request ID")),
    request_body(content = ReviewMoneyRequest, description = "Optional admin note"),
    responses(
        (status = 200, description = "Request approved", body = ApproveResponse),
        (status = 400, description = "Insufficient balance", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 409, description = "Request already reviewed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_money_request(
    pool: web::Data<DbPool>,
    req_http: HttpRequest,
    path: web::Path<String>,
    body: Option<web::Json<ReviewMoneyRequest>>,
) -> impl Responder {
    let admin = match require_admin(&req_http) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let note = match review_note(&body) {
        Ok(note) => note,
        Err(resp) => return resp,
    };

    let outcome = match handle_write_error(
        MoneyRequestRepository::approve(&pool, &path, &admin.sub, note).await,
        "approve money request",
        "Admin account",
        None,
    ) {
        Ok(outcome) => outcome,
        Err(resp) => return resp,
    };

    match outcome {
        ApprovalOutcome::Approved { request, balance } => HttpResponse::Ok().json(ApproveResponse {
            success: true,
            request: MoneyRequestResponse::from(request),
            balance,
        }),
        ApprovalOutcome::NotFound => {
            error_response(StatusCode::NOT_FOUND, "not_found", "Money request not found")
        }
        ApprovalOutcome::NotPending(status) => invalid_status("Money request", &status),
        ApprovalOutcome::BalanceRejected(e) => balance_error(&e),
    }
}

/// Reject a pending request; the balance is untouched (admin)
#[utoipa::path(
    post,
    path = "/api/money-requests/{id}/reject",
    tag = "Money Requests",
    params(("id" = String, Path, description = "Money request ID")),
    request_body(content = ReviewMoneyRequest, description = "Optional admin note"),
    responses(
        (status = 200, description = "Request rejected", body = MoneyRequestEnvelope),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 409, description = "Request already reviewed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_money_request(
    pool: web::Data<DbPool>,
    req_http: HttpRequest,
    path: web::Path<String>,
    body: Option<web::Json<ReviewMoneyRequest>>,
) -> impl Responder {
    let admin = match require_admin(&req_http) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let note = match review_note(&body) {
        Ok(note) => note,
        Err(resp) => return resp,
    };

    let outcome = match handle_write_error(
        MoneyRequestRepository::reject(&pool, &path, &admin.sub, note).await,
        "reject money request",
        "Admin account",
        None,
    ) {
        Ok(outcome) => outcome,
        Err(resp) => return resp,
    };

    match outcome {
        ReviewOutcome::Done(request) => {
            tracing::info!(admin_id = %admin.sub, request_id = %request.id, "Money request rejected");
            HttpResponse::Ok().json(MoneyRequestEnvelope::new(request))
        }
        ReviewOutcome::NotFound => {
            error_response(StatusCode::NOT_FOUND, "not_found", "Money request not found")
        }
        ReviewOutcome::NotPending(status) => invalid_status("Money request", &status),
    }
}
