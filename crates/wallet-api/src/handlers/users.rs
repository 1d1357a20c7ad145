//! Own-profile handlers

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use shared::DbPool;

use super::helpers::{require_found, validate_request};
use crate::middleware::get_user_id;
use crate::models::{ErrorResponse, UpdateProfileRequest, UserEnvelope};
use crate::repositories::UserRepository;

/// Own profile
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = UserEnvelope),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(pool: web::Data<DbPool>, req_http: HttpRequest) -> impl Responder {
    let user_id = match get_user_id(&req_http) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match require_found(UserRepository::find_by_id(&pool, &user_id).await, "User") {
        Ok(user) => HttpResponse::Ok().json(UserEnvelope::new(user)),
        Err(resp) => resp,
    }
}

/// Update own profile
///
/// Only personal details can change here. Email, role, balance, KYC status
/// and account type are administered elsewhere.
#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "Users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserEnvelope),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    pool: web::Data<DbPool>,
    req_http: HttpRequest,
    req: web::Json<UpdateProfileRequest>,
) -> impl Responder {
    let user_id = match get_user_id(&req_http) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(resp) = validate_request(&*req) {
        return resp;
    }

    match require_found(
        UserRepository::update_profile(&pool, &user_id, &req).await,
        "User",
    ) {
        Ok(user) => {
            tracing::info!(user_id = %user_id, "Profile updated");
            HttpResponse::Ok().json(UserEnvelope::new(user))
        }
        Err(resp) => resp,
    }
}
