//! Request handlers for API endpoints

pub mod admin;
pub mod auth;
pub mod documents;
pub mod health;
pub mod helpers;
pub mod investments;
pub mod money_requests;
pub mod transactions;
pub mod uploads;
pub mod users;

// Re-export commonly used handlers
pub use admin::*;
pub use auth::*;
pub use documents::*;
pub use health::*;
pub use investments::*;
pub use money_requests::*;
pub use transactions::*;
pub use uploads::*;
pub use users::*;
