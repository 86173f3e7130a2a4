// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers for the auth endpoints.

pub mod auth;
pub mod webhook;

/// Liveness check
pub async fn healthz() -> &'static str {
    "OK"
}
