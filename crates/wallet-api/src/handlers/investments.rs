//! Investment handlers
//!
//! Investments are informational records kept by administrators. Creating,
//! editing or deleting one never moves a balance.

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use shared::models::Investment;
use shared::DbPool;

use super::helpers::{
    bad_request, error_response, handle_db_error, handle_write_error, require_found,
    validate_request,
};
use crate::middleware::{get_user_id, require_admin};
use crate::models::{
    CreateInvestmentRequest, ErrorResponse, InvestmentEnvelope, InvestmentListResponse,
    InvestmentQuery, MessageResponse, UpdateInvestmentRequest,
};
use crate::repositories::{InvestmentRepository, UserRepository};

const DATE_ORDER_MESSAGE: &str = "End date cannot be before the start date";

/// True when applying `update` to `current` keeps the end date on or after the start date
fn update_keeps_dates_ordered(current: &Investment, update: &UpdateInvestmentRequest) -> bool {
    let start = update.start_date.unwrap_or(current.start_date);
    update
        .end_date
        .or(current.end_date)
        .map_or(true, |end| end >= start)
}

/// Own investments
#[utoipa::path(
    get,
    path = "/api/investments/my",
    tag = "Investments",
    responses(
        (status = 200, description = "Own investments", body = InvestmentListResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_investments(pool: web::Data<DbPool>, req_http: HttpRequest) -> impl Responder {
    let user_id = match get_user_id(&req_http) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match handle_db_error(
        InvestmentRepository::list(&pool, Some(&user_id)).await,
        "list investments",
    ) {
        Ok(rows) => HttpResponse::Ok().json(InvestmentListResponse::new(rows)),
        Err(resp) => resp,
    }
}

/// Record an investment for a user (admin)
#[utoipa::path(
    post,
    path = "/api/admin/investments",
    tag = "Investments",
    request_body = CreateInvestmentRequest,
    responses(
        (status = 201, description = "Investment created", body = InvestmentEnvelope),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_investment(
    pool: web::Data<DbPool>,
    req_http: HttpRequest,
    req: web::Json<CreateInvestmentRequest>,
) -> impl Responder {
    let admin = match require_admin(&req_http) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };

    if let Err(resp) = validate_request(&*req) {
        return resp;
    }
    if !req.dates_are_ordered() {
        return bad_request(DATE_ORDER_MESSAGE);
    }

    if let Err(resp) = require_found(UserRepository::find_by_id(&pool, &req.user_id).await, "User") {
        return resp;
    }

    match handle_write_error(
        InvestmentRepository::create(&pool, &req).await,
        "create investment",
        "User",
        None,
    ) {
        Ok(investment) => {
            tracing::info!(
                admin_id = %admin.sub,
                user_id = %investment.user_id,
                investment_id = %investment.id,
                "Investment created"
            );
            HttpResponse::Created().json(InvestmentEnvelope::new(investment))
        }
        Err(resp) => resp,
    }
}

/// All investments, optionally for one user (admin)
#[utoipa::path(
    get,
    path = "/api/admin/investments",
    tag = "Investments",
    params(InvestmentQuery),
    responses(
        (status = 200, description = "Investments", body = InvestmentListResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_investments(
    pool: web::Data<DbPool>,
    query: web::Query<InvestmentQuery>,
) -> impl Responder {
    let user_id = query
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    match handle_db_error(
        InvestmentRepository::list(&pool, user_id).await,
        "list investments",
    ) {
        Ok(rows) => HttpResponse::Ok().json(InvestmentListResponse::new(rows)),
        Err(resp) => resp,
    }
}

/// Partial update (admin)
#[utoipa::path(
    put,
    path = "/api/admin/investments/{id}",
    tag = "Investments",
    params(("id" = String, Path, description = "Investment ID")),
    request_body = UpdateInvestmentRequest,
    responses(
        (status = 200, description = "Investment updated", body = InvestmentEnvelope),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Investment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_investment(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    req: web::Json<UpdateInvestmentRequest>,
) -> impl Responder {
    let investment_id = path.into_inner();

    if let Err(resp) = validate_request(&*req) {
        return resp;
    }

    let current = match require_found(
        InvestmentRepository::find_by_id(&pool, &investment_id).await,
        "Investment",
    ) {
        Ok(investment) => investment,
        Err(resp) => return resp,
    };

    if !update_keeps_dates_ordered(&current, &req) {
        return bad_request(DATE_ORDER_MESSAGE);
    }

    match require_found(
        InvestmentRepository::update(&pool, &investment_id, &req).await,
        "Investment",
    ) {
        Ok(investment) => HttpResponse::Ok().json(InvestmentEnvelope::new(investment)),
        Err(resp) => resp,
    }
}

/// Delete an investment record (admin)
#[utoipa::path(
    delete,
    path = "/api/admin/investments/{id}",
    tag = "Investments",
    params(("id" = String, Path, description = "Investment ID")),
    responses(
        (status = 200, description = "Investment deleted", body = MessageResponse),
        (status = 404, description = "Investment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_investment(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> impl Responder {
    match handle_db_error(
        InvestmentRepository::delete(&pool, &path).await,
        "delete investment",
    ) {
        Ok(true) => HttpResponse::Ok().json(MessageResponse::new("Investment deleted")),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "not_found", "Investment not found"),
        Err(resp) => resp,
    }
}
