//! Request and response DTOs

pub mod admin;
pub mod auth;
pub mod common;
pub mod documents;
pub mod investments;
pub mod money_requests;
pub mod transactions;
pub mod users;

pub use admin::*;
pub use auth::*;
pub use common::*;
pub use documents::*;
pub use investments::*;
pub use money_requests::*;
pub use transactions::*;
pub use users::*;
