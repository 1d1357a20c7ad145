//! Authentication handlers

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use once_cell::sync::Lazy;
use shared::models::User;
use shared::{Config, DbPool};

use super::helpers::{
    email_exists, error_response, handle_db_error, handle_write_error, internal_error,
    require_found, validate_request,
};
use crate::middleware::{get_user_id, ip_extractor};
use crate::models::{
    normalize_email, AuthResponse, ChangePasswordRequest, ErrorResponse, LoginRequest,
    MessageResponse, RegisterRequest, UserEnvelope, UserResponse, UserRole,
};
use crate::repositories::{NewUser, UserRepository};
use crate::services::{passwords, tokens, LoginRateLimiter};

/// Verified against when the email is unknown so both failure paths cost the same
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| passwords::hash_password("timing-equaliser").ok());

/// Trimmed optional field, `None` when blank
fn optional(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn auth_response(user: User, config: &Config) -> Result<AuthResponse, HttpResponse> {
    let token = tokens::issue_for_user(
        &user,
        &config.server.jwt_secret,
        config.server.jwt_expiration_hours,
    )
    .map_err(|e| internal_error("issue token", e))?;

    Ok(AuthResponse {
        success: true,
        token,
        user: UserResponse::from(user),
    })
}

/// Register a new customer account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    req: web::Json<RegisterRequest>,
) -> impl Responder {
    if let Err(resp) = validate_request(&*req) {
        return resp;
    }

    let email = normalize_email(&req.email);

    match handle_db_error(UserRepository::email_exists(&pool, &email).await, "process registration") {
        Ok(false) => {}
        Ok(true) => return email_exists(),
        Err(resp) => return resp,
    }

    let password_hash = match passwords::hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => return internal_error("hash password", e),
    };

    let new_user = NewUser {
        title: optional(&req.title),
        full_name: req.full_name.trim(),
        email: &email,
        password_hash: &password_hash,
        role: UserRole::User,
        phone: optional(&req.phone),
        dob: req.dob,
        address1: optional(&req.address1),
        address2: optional(&req.address2),
        city: optional(&req.city),
        state: optional(&req.state),
        postal_code: optional(&req.postal_code),
        country: optional(&req.country),
        account_type: req.account_type.unwrap_or_default(),
    };

    // Two sign-ups racing on one email both pass the check above; the unique
    // index decides the loser
    let user = match handle_write_error(
        UserRepository::create(&pool, &new_user).await,
        "create user",
        "User",
        Some(email_exists),
    ) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    tracing::info!(user_id = %user.id, "User registered");

    match auth_response(user, &config) {
        Ok(body) => HttpResponse::Created().json(body),
        Err(resp) => resp,
    }
}

/// Rate-limit, look up and verify credentials
async fn authenticate(
    pool: &DbPool,
    limiter: &LoginRateLimiter,
    req_http: &HttpRequest,
    req: &LoginRequest,
) -> Result<User, HttpResponse> {
    let ip = ip_extractor::extract_ip(req_http);
    if let Err(limited) = limiter.check(&ip) {
        let retry_secs = limited.retry_after.as_secs().max(1);
        return Err(HttpResponse::TooManyRequests()
            .insert_header(("Retry-After", retry_secs.to_string()))
            .json(ErrorResponse::new(
                "rate_limited",
                "Too many login attempts. Please try again later.",
            )));
    }

    validate_request(req)?;

    let email = normalize_email(&req.email);
    let user = handle_db_error(UserRepository::find_by_email(pool, &email).await, "log in")?;

    let verified = match &user {
        Some(user) => passwords::verify_password(&req.password, &user.password_hash),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                passwords::verify_password(&req.password, dummy);
            }
            false
        }
    };

    let user = match (user, verified) {
        (Some(user), true) => user,
        _ => {
            tracing::info!(ip = %ip, "Failed login attempt");
            return Err(error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password",
            ));
        }
    };

    if let Err(e) = UserRepository::update_last_login(pool, &user.id).await {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to record last login");
    }

    Ok(user)
}

/// Log in with email and password
///
/// The returned user carries `role` so the client can route admins to the
/// admin console.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    )
)]
pub async fn login(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    limiter: web::Data<LoginRateLimiter>,
    req_http: HttpRequest,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    let user = match authenticate(&pool, &limiter, &req_http, &req).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    match auth_response(user, &config) {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(resp) => resp,
    }
}

/// Log in to the admin console; customer accounts are refused
#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "Admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Not an admin account", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    )
)]
pub async fn admin_login(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    limiter: web::Data<LoginRateLimiter>,
    req_http: HttpRequest,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    let user = match authenticate(&pool, &limiter, &req_http, &req).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    if user.role != UserRole::Admin.as_str() {
        tracing::warn!(user_id = %user.id, "Customer account tried the admin login");
        return error_response(StatusCode::FORBIDDEN, "not_admin", "Admin access required");
    }

    tracing::info!(user_id = %user.id, "Admin logged in");

    match auth_response(user, &config) {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(resp) => resp,
    }
}

/// Current user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserEnvelope),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(pool: web::Data<DbPool>, req_http: HttpRequest) -> impl Responder {
    let user_id = match get_user_id(&req_http) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match require_found(UserRepository::find_by_id(&pool, &user_id).await, "User") {
        Ok(user) => HttpResponse::Ok().json(UserEnvelope::new(user)),
        Err(resp) => resp,
    }
}

/// Change own password
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = "Auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Wrong current password or invalid new password", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    pool: web::Data<DbPool>,
    req_http: HttpRequest,
    req: web::Json<ChangePasswordRequest>,
) -> impl Responder {
    let user_id = match get_user_id(&req_http) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(resp) = validate_request(&*req) {
        return resp;
    }

    let user = match require_found(UserRepository::find_by_id(&pool, &user_id).await, "User") {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    if !passwords::verify_password(&req.current_password, &user.password_hash) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_password",
            "Current password is incorrect",
        );
    }

    if req.new_password == req.current_password {
        return error_response(
            StatusCode::BAD_REQUEST,
            "password_unchanged",
            "New password must differ from the current password",
        );
    }

    let password_hash = match passwords::hash_password(&req.new_password) {
        Ok(hash) => hash,
        Err(e) => return internal_error("hash password", e),
    };

    if let Err(resp) = handle_db_error(
        UserRepository::update_password(&pool, &user_id, &password_hash).await,
        "update password",
    ) {
        return resp;
    }

    tracing::info!(user_id = %user_id, "Password changed");

    HttpResponse::Ok().json(MessageResponse::new("Password updated successfully"))
}
