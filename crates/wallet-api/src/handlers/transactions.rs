//! Balance statement handlers

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use shared::DbPool;

use super::helpers::{bad_request, handle_db_error};
use crate::middleware::get_user_id;
use crate::models::{ErrorResponse, PaginationMeta, PaginationParams, TransactionListResponse};
use crate::repositories::TransactionRepository;

/// Own statement, newest first
#[utoipa::path(
    get,
    path = "/api/transactions/my",
    tag = "Transactions",
    params(
        ("limit" = Option<i64>, Query, description = "Page size (1-100, default 20)"),
        ("offset" = Option<i64>, Query, description = "Rows to skip")
    ),
    responses(
        (status = 200, description = "Statement lines", body = TransactionListResponse),
        (status = 400, description = "Invalid pagination", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_transactions(
    pool: web::Data<DbPool>,
    req_http: HttpRequest,
    query: web::Query<PaginationParams>,
) -> impl Responder {
    let user_id = match get_user_id(&req_http) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(msg) = query.validate() {
        return bad_request(&msg);
    }

    let total = match handle_db_error(
        TransactionRepository::count_for_user(&pool, &user_id).await,
        "count transactions",
    ) {
        Ok(total) => total,
        Err(resp) => return resp,
    };

    match handle_db_error(
        TransactionRepository::list_for_user(&pool, &user_id, query.limit, query.offset).await,
        "list transactions",
    ) {
        Ok(rows) => HttpResponse::Ok().json(TransactionListResponse::new(
            rows,
            Some(PaginationMeta::new(total, query.limit, query.offset)),
        )),
        Err(resp) => resp,
    }
}
