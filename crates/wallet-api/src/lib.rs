//! Wallet admin API library
//!
//! Exposes the application modules so integration tests can mount the real
//! routes.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod routes;
pub mod services;
