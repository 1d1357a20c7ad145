//! Default administrator bootstrap
//!
//! Runs once at startup after migrations. Never fails the startup: every
//! problem is logged and the server starts regardless.

use shared::{AdminBootstrapConfig, DbPool};

use crate::models::{normalize_email, AccountType, UserRole};
use crate::repositories::{NewUser, UserRepository};
use crate::services::passwords;

const ADMIN_FULL_NAME: &str = "Administrator";

/// What the bootstrap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created,
    AdminExists,
    NotConfigured,
    EmailInUse,
    Failed,
}

/// Decide whether a default admin may be created from the configuration
///
/// Returns the normalised email and the password.
pub fn bootstrap_credentials(config: &AdminBootstrapConfig) -> Option<(String, &str)> {
    config
        .credentials()
        .map(|(email, password)| (normalize_email(email), password))
}

/// Create the default admin if no admin account exists yet
pub async fn ensure_default_admin(pool: &DbPool, config: &AdminBootstrapConfig) -> BootstrapOutcome {
    match UserRepository::admin_exists(pool).await {
        Ok(true) => {
            tracing::info!("Admin account present; skipping default admin bootstrap");
            return BootstrapOutcome::AdminExists;
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!(error = %e, "Default admin bootstrap failed");
            return BootstrapOutcome::Failed;
        }
    }

    let Some((email, password)) = bootstrap_credentials(config) else {
        tracing::warn!("No admin account and ADMIN_EMAIL/ADMIN_PASSWORD not set; skipping bootstrap");
        return BootstrapOutcome::NotConfigured;
    };

    match UserRepository::email_exists(pool, &email).await {
        Ok(false) => {}
        Ok(true) => {
            tracing::warn!(email = %email, "ADMIN_EMAIL belongs to an existing customer; not promoting it");
            return BootstrapOutcome::EmailInUse;
        }
        Err(e) => {
            tracing::error!(error = %e, "Default admin bootstrap failed");
            return BootstrapOutcome::Failed;
        }
    }

    let password_hash = match passwords::hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "Failed to hash default admin password");
            return BootstrapOutcome::Failed;
        }
    };

    let new_admin = NewUser {
        title: None,
        full_name: ADMIN_FULL_NAME,
        email: &email,
        password_hash: &password_hash,
        role: UserRole::Admin,
        phone: None,
        dob: None,
        address1: None,
        address2: None,
        city: None,
        state: None,
        postal_code: None,
        country: None,
        account_type: AccountType::Personal,
    };

    match UserRepository::create(pool, &new_admin).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, email = %user.email, "Default admin created");
            BootstrapOutcome::Created
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create default admin");
            BootstrapOutcome::Failed
        }
    }
}
