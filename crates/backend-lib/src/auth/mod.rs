// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Credential and session-token subsystem.

pub mod access_token;
mod error;
pub mod headers;
pub mod password;
pub mod refresh_token;
pub mod session;

pub use access_token::{AccessTokenClaims, AccessTokenIssuer, MAX_ACCESS_TOKEN_TTL, TOKEN_ISSUER};
pub use error::AuthError;
pub use headers::{extract_api_key, extract_bearer, extract_credential, AuthScheme};
pub use password::{
    hash_password_secure, PasswordCredential, DEFAULT_PASSWORD_COST, MIN_PASSWORD_COST,
};
pub use refresh_token::{
    generate_refresh_token, RefreshToken, RefreshTokenStore, TokenState, REFRESH_TOKEN_TTL_HOURS,
};
pub use session::{LoginInput, LoginOutput, SessionService};
