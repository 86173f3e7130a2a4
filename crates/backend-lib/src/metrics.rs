// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for auth metric keys
pub const LOGIN_SUCCEEDED: &str = "auth.login.succeeded";
pub const LOGIN_FAILED: &str = "auth.login.failed";
pub const ACCESS_TOKEN_ISSUED: &str = "auth.access_token.issued";
pub const REFRESH_TOKEN_CREATED: &str = "auth.refresh_token.created";
pub const REFRESH_TOKEN_REVOKED: &str = "auth.refresh_token.revoked";
pub const REFRESH_REJECTED: &str = "auth.refresh.rejected";
pub const WEBHOOK_RECEIVED: &str = "webhook.received";
