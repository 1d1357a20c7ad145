//! HTTP middleware for the wallet API

pub mod cors;
pub mod ip_extractor;
pub mod jwt_auth;
pub mod request_id;
pub mod security_headers;

pub use cors::cors;
pub use jwt_auth::{get_claims, get_user_id, require_admin, require_customer, JwtAuth};
pub use request_id::RequestId;
pub use security_headers::SecurityHeaders;
