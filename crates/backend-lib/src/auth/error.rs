// ============================
// crates/backend-lib/src/auth/error.rs
// ============================
//! Credential and token failure taxonomy.
use axum::http::StatusCode;
use thiserror::Error;

use crate::storage::StorageError;

/// Failures raised by the credential and session-token subsystem
#[derive(Error, Debug)]
pub enum AuthError {
    /// `Authorization` header absent, empty, or not in the expected scheme
    #[error("missing or malformed credential")]
    MissingCredential,

    /// Unknown email or wrong password; both look the same to callers
    #[error("incorrect email or password")]
    CredentialMismatch,

    /// Access token failed validation (signature, claims or expiry)
    #[error("token is invalid or expired")]
    TokenInvalid,

    #[error("refresh token not found")]
    TokenNotFound,

    #[error("refresh token has expired")]
    TokenExpired,

    #[error("refresh token has been revoked")]
    TokenRevoked,

    /// Uniform rejection for protected endpoints
    #[error("unauthorized")]
    Unauthorized,

    #[error("password hashing failed: {0}")]
    HashFailure(String),

    #[error("token signing failed: {0}")]
    Signing(String),

    /// Token lifetime pushes the expiry past the representable range
    #[error("token expiry out of range")]
    ExpiryOverflow,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// HTTP status the transport layer should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential => StatusCode::BAD_REQUEST,
            AuthError::CredentialMismatch
            | AuthError::TokenInvalid
            | AuthError::TokenNotFound
            | AuthError::TokenExpired
            | AuthError::TokenRevoked
            | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::HashFailure(_)
            | AuthError::Signing(_)
            | AuthError::ExpiryOverflow
            | AuthError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "AUTH_001",
            AuthError::CredentialMismatch => "AUTH_002",
            AuthError::TokenInvalid => "AUTH_003",
            AuthError::TokenNotFound => "AUTH_004",
            AuthError::TokenExpired => "AUTH_005",
            AuthError::TokenRevoked => "AUTH_006",
            AuthError::Unauthorized => "AUTH_007",
            AuthError::HashFailure(_) => "AUTH_008",
            AuthError::Signing(_) => "AUTH_009",
            AuthError::ExpiryOverflow => "AUTH_010",
            AuthError::Storage(_) => "STORE_001",
        }
    }

    /// True for failures that indicate a server-side fault
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}
