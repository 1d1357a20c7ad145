//! Business services used by the handlers

pub mod bootstrap;
pub mod document_storage;
pub mod login_rate_limiter;
pub mod passwords;
pub mod tokens;

pub use document_storage::{DocumentStorage, StorageError};
pub use login_rate_limiter::LoginRateLimiter;
