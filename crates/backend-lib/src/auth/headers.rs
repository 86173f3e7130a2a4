// ============================
// crates/backend-lib/src/auth/headers.rs
// ============================
//! `Authorization` header parsing.
//!
//! Session tokens and the service API key share the same header, so callers
//! name the scheme they expect for their endpoint. A credential sent with the
//! other scheme is reported as missing.
use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::AuthError;

/// Credential scheme carried in the `Authorization` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Bearer <token>`, used for access and refresh tokens
    Bearer,
    /// `ApiKey <key>`, used by the trusted webhook caller
    ApiKey,
}

impl AuthScheme {
    /// Header prefix including the single separating space
    pub fn prefix(self) -> &'static str {
        match self {
            AuthScheme::Bearer => "Bearer ",
            AuthScheme::ApiKey => "ApiKey ",
        }
    }
}

/// Read the credential for `scheme` from the headers.
///
/// The remainder after the prefix is returned verbatim, including an empty
/// string; rejecting an empty token is left to whoever validates it.
pub fn extract_credential(headers: &HeaderMap, scheme: AuthScheme) -> Result<String, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingCredential)?;

    value
        .strip_prefix(scheme.prefix())
        .map(str::to_string)
        .ok_or(AuthError::MissingCredential)
}

/// Read a `Bearer` token
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_credential(headers, AuthScheme::Bearer)
}

/// Read an `ApiKey` credential
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_credential(headers, AuthScheme::ApiKey)
}
