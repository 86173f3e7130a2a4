// crates/backend-lib/src/middleware/mod.rs

//! Request guards for the Chirpy API server.

pub mod auth;

pub use auth::{require_api_key, AuthUser};

#[cfg(test)]
mod tests;
