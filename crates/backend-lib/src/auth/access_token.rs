// ============================
// crates/backend-lib/src/auth/access_token.rs
// ============================
//! Stateless signed access tokens (HS256 JWT).
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use uuid::Uuid;

use super::AuthError;
use crate::clock::{Clock, SystemClock};

/// Issuer label stamped into every token
pub const TOKEN_ISSUER: &str = "chirpy";

/// Upper bound on access-token lifetime; longer requests are clamped
pub const MAX_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Issuer
    pub iss: String,
    /// Subject: user id as 32 lowercase hex characters
    pub sub: String,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

/// Mints and validates access tokens against a shared secret
#[derive(Clone)]
pub struct AccessTokenIssuer {
    clock: Arc<dyn Clock>,
}

impl Default for AccessTokenIssuer {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl AccessTokenIssuer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Sign a token for `user_id` valid for `ttl`, clamped to
    /// [`MAX_ACCESS_TOKEN_TTL`].
    pub fn issue(&self, user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, AuthError> {
        let ttl = clamp_ttl(ttl);
        let now = self.clock.now().timestamp();
        let claims = AccessTokenClaims {
            iss: TOKEN_ISSUER.to_string(),
            sub: hex::encode(user_id.as_bytes()),
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Check signature, issuer and expiry, and recover the user id.
    ///
    /// Every failure is reported as [`AuthError::TokenInvalid`].
    pub fn validate(&self, token: &str, secret: &str) -> Result<Uuid, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["iss", "sub", "iat", "exp"]);
        // expiry is checked below against the injected clock
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = jsonwebtoken::decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::TokenInvalid)?;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AuthError::TokenInvalid);
        }

        decode_subject(&claims.sub).ok_or(AuthError::TokenInvalid)
    }
}

/// Apply the lifetime bound
pub fn clamp_ttl(ttl: Duration) -> Duration {
    ttl.min(MAX_ACCESS_TOKEN_TTL)
}

fn decode_subject(sub: &str) -> Option<Uuid> {
    let bytes = hex::decode(sub).ok()?;
    Uuid::from_slice(&bytes).ok()
}
