//! OpenAPI Documentation Configuration
//!
//! Generated by utoipa from the handler annotations and DTO schemas.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::handlers::health::HealthResponse;
use crate::models;

/// OpenAPI documentation for the wallet admin API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wallet Admin API",
        version = "1.0.0",
        description = "Customer wallet backend with an admin console.\n\n## Authentication\n\nSend `Authorization: Bearer <token>` with the token returned by `/api/auth/login` or `/api/admin/login`. Routes under `/api/admin` (except login) require an admin account.\n\n## Amounts\n\nAmounts are JSON numbers with two decimal places; request bodies also accept numeric strings."
    ),
    servers(
        (url = "http://localhost:5000", description = "Development server")
    ),
    tags(
        (name = "Health", description = "Health check and API description"),
        (name = "Auth", description = "Registration, login and password changes"),
        (name = "Users", description = "Own profile"),
        (name = "Documents", description = "KYC document upload and review"),
        (name = "Money Requests", description = "Deposit and withdraw requests"),
        (name = "Transactions", description = "Balance statement"),
        (name = "Investments", description = "Investment records"),
        (name = "Admin", description = "Admin console")
    ),
    modifiers(&SecurityAddon),
    paths(
        // Health
        handlers::health_check,
        handlers::openapi_json,
        // Auth
        handlers::register,
        handlers::login,
        handlers::me,
        handlers::change_password,
        // Users
        handlers::get_profile,
        handlers::update_profile,
        // Documents
        handlers::upload_document,
        handlers::my_documents,
        handlers::delete_document,
        handlers::verify_document,
        handlers::reject_document,
        handlers::serve_kyc_file,
        // Money requests
        handlers::create_money_request,
        handlers::my_money_requests,
        handlers::list_money_requests,
        handlers::approve_money_request,
        handlers::reject_money_request,
        // Transactions
        handlers::my_transactions,
        // Investments
        handlers::my_investments,
        handlers::create_investment,
        handlers::list_investments,
        handlers::update_investment,
        handlers::delete_investment,
        // Admin
        handlers::admin_login,
        handlers::list_users,
        handlers::get_user,
        handlers::update_user,
        handlers::adjust_balance,
        handlers::reset_password,
        handlers::delete_user,
        handlers::user_transactions,
        handlers::admin_stats,
    ),
    components(
        schemas(
            // Common
            models::ErrorResponse,
            models::MessageResponse,
            models::PaginationMeta,
            // Auth
            models::UserRole,
            models::RegisterRequest,
            models::LoginRequest,
            models::ChangePasswordRequest,
            models::AuthResponse,
            models::UserEnvelope,
            models::UserResponse,
            // Users
            models::AccountType,
            models::UpdateProfileRequest,
            models::AdminUpdateUserRequest,
            // Documents
            models::DocumentType,
            models::DocumentStatus,
            models::KycStatus,
            models::UploadDocumentRequest,
            models::DocumentResponse,
            models::DocumentEnvelope,
            models::DocumentListResponse,
            // Money requests
            models::RequestType,
            models::RequestStatus,
            models::PaymentMethod,
            models::CreateMoneyRequest,
            models::ReviewMoneyRequest,
            models::MoneyRequestResponse,
            models::MoneyRequestEnvelope,
            models::MoneyRequestListResponse,
            models::ApproveResponse,
            // Transactions
            models::TransactionResponse,
            models::TransactionListResponse,
            // Investments
            models::InvestmentStatus,
            models::CreateInvestmentRequest,
            models::UpdateInvestmentRequest,
            models::InvestmentResponse,
            models::InvestmentEnvelope,
            models::InvestmentListResponse,
            // Admin
            models::AdjustmentType,
            models::BalanceAdjustmentRequest,
            models::BalanceResponse,
            models::ResetPasswordRequest,
            models::UserListResponse,
            models::UserDetailResponse,
            models::AdminStatsResponse,
            // Health
            HealthResponse,
        )
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "JWT obtained from /api/auth/login or /api/admin/login",
                    ))
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_has_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("ErrorResponse"));
    }

    #[test]
    fn test_openapi_covers_admin_routes() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = json["paths"].as_object().unwrap();
        for path in [
            "/api/admin/login",
            "/api/admin/users/{id}/balance",
            "/api/admin/investments/{id}",
            "/api/documents/verify/{id}",
            "/uploads/kyc/{filename}",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }
}
