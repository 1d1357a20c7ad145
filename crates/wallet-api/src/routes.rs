//! Route configuration for the API
//!
//! Each resource gets its own `/api/<name>` scope instead of one `/api`
//! scope, so the Swagger UI mounted at `/api/docs` is not shadowed.

use actix_web::web;

use crate::{handlers, middleware::JwtAuth};

/// Configure all routes
pub fn configure(cfg: &mut web::ServiceConfig, jwt_secret: &str) {
    // Public service endpoints
    cfg.route("/api/health", web::get().to(handlers::health_check))
        .route("/api/openapi.json", web::get().to(handlers::openapi_json))
        // Stored KYC files, public like a static mount
        .route(
            "/uploads/kyc/{filename}",
            web::get().to(handlers::serve_kyc_file),
        );

    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(handlers::register))
            .route("/login", web::post().to(handlers::login))
            .service(
                web::scope("")
                    .wrap(JwtAuth::new(jwt_secret))
                    .route("/me", web::get().to(handlers::me))
                    .route("/change-password", web::post().to(handlers::change_password)),
            ),
    );

    cfg.service(
        web::scope("/api/users")
            .wrap(JwtAuth::new(jwt_secret))
            .route("/profile", web::get().to(handlers::get_profile))
            .route("/profile", web::put().to(handlers::update_profile)),
    );

    // Owners and admins share this scope; admin-only routes check the role
    cfg.service(
        web::scope("/api/documents")
            .wrap(JwtAuth::new(jwt_secret))
            .route("", web::post().to(handlers::upload_document))
            .route("/my", web::get().to(handlers::my_documents))
            .route("/verify/{id}", web::post().to(handlers::verify_document))
            .route("/reject/{id}", web::post().to(handlers::reject_document))
            .route("/{id}", web::delete().to(handlers::delete_document)),
    );

    cfg.service(
        web::scope("/api/money-requests")
            .wrap(JwtAuth::new(jwt_secret))
            .route("", web::post().to(handlers::create_money_request))
            .route("", web::get().to(handlers::list_money_requests))
            .route("/my", web::get().to(handlers::my_money_requests))
            .route("/{id}/approve", web::post().to(handlers::approve_money_request))
            .route("/{id}/reject", web::post().to(handlers::reject_money_request)),
    );

    cfg.service(
        web::scope("/api/transactions")
            .wrap(JwtAuth::new(jwt_secret))
            .route("/my", web::get().to(handlers::my_transactions)),
    );

    cfg.service(
        web::scope("/api/investments")
            .wrap(JwtAuth::new(jwt_secret))
            .route("/my", web::get().to(handlers::my_investments)),
    );

    cfg.service(
        web::scope("/api/admin")
            .route("/login", web::post().to(handlers::admin_login))
            .service(
                web::scope("")
                    .wrap(JwtAuth::admin(jwt_secret))
                    .route("/stats", web::get().to(handlers::admin_stats))
                    .route("/users", web::get().to(handlers::list_users))
                    .route("/users/{id}", web::get().to(handlers::get_user))
                    .route("/users/{id}", web::put().to(handlers::update_user))
                    .route("/users/{id}", web::delete().to(handlers::delete_user))
                    .route("/users/{id}/balance", web::post().to(handlers::adjust_balance))
                    .route(
                        "/users/{id}/reset-password",
                        web::post().to(handlers::reset_password),
                    )
                    .route(
                        "/users/{id}/transactions",
                        web::get().to(handlers::user_transactions),
                    )
                    .route("/investments", web::post().to(handlers::create_investment))
                    .route("/investments", web::get().to(handlers::list_investments))
                    .route("/investments/{id}", web::put().to(handlers::update_investment))
                    .route(
                        "/investments/{id}",
                        web::delete().to(handlers::delete_investment),
                    ),
            ),
    );
}
