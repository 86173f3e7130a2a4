// ============================
// crates/backend-lib/src/auth/refresh_token.rs
// ============================
//! Opaque, persisted refresh tokens.
//!
//! A token is 256 bits from the OS RNG, hex-encoded. Records are never
//! deleted; they leave the usable state either by passing `expires_at`
//! (derived on read) or by revocation, which is permanent.
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, TryRngCore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::AuthError;
use crate::storage::RefreshTokenRepository;

/// Default refresh-token lifetime in hours (60 days)
pub const REFRESH_TOKEN_TTL_HOURS: i64 = 1440;

/// Token size in bytes (32 bytes = 256 bits of entropy)
const REFRESH_TOKEN_BYTES: usize = 32;

/// Persisted refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Lifecycle state of a refresh token at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Active,
    Expired,
    Revoked,
}

impl RefreshToken {
    /// Revocation wins over expiry
    pub fn state(&self, now: DateTime<Utc>) -> TokenState {
        if self.revoked_at.is_some() {
            TokenState::Revoked
        } else if now >= self.expires_at {
            TokenState::Expired
        } else {
            TokenState::Active
        }
    }

    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.state(now) == TokenState::Active
    }
}

/// Generate a cryptographically secure refresh token string
pub fn generate_refresh_token() -> Result<String, AuthError> {
    let mut buffer = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut buffer)
        .map_err(|e| AuthError::HashFailure(format!("entropy source: {e}")))?;
    Ok(hex::encode(buffer))
}

/// Refresh-token lifecycle over a repository
pub struct RefreshTokenStore<R: ?Sized> {
    repo: Arc<R>,
    ttl: Duration,
}

impl<R: ?Sized> Clone for RefreshTokenStore<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            ttl: self.ttl,
        }
    }
}

impl<R: RefreshTokenRepository + ?Sized> RefreshTokenStore<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_ttl(repo, Duration::hours(REFRESH_TOKEN_TTL_HOURS))
    }

    pub fn with_ttl(repo: Arc<R>, ttl: Duration) -> Self {
        Self { repo, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint and persist a new token for `user_id`
    pub async fn create(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<RefreshToken, AuthError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::ExpiryOverflow)?;
        let record = RefreshToken {
            token: generate_refresh_token()?,
            user_id,
            created_at: now,
            updated_at: now,
            expires_at,
            revoked_at: None,
        };
        Ok(self.repo.insert_refresh_token(record).await?)
    }

    pub async fn lookup(&self, token: &str) -> Result<RefreshToken, AuthError> {
        self.repo
            .get_refresh_token(token)
            .await?
            .ok_or(AuthError::TokenNotFound)
    }

    /// Mark a token revoked. Revoking twice keeps the first timestamp.
    pub async fn revoke(&self, token: &str, now: DateTime<Utc>) -> Result<RefreshToken, AuthError> {
        self.repo
            .revoke_refresh_token(token, now)
            .await?
            .ok_or(AuthError::TokenNotFound)
    }

    /// All tokens ever issued to a user, oldest first
    pub async fn tokens_for_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, AuthError> {
        Ok(self.repo.refresh_tokens_for_user(user_id).await?)
    }

    /// Revoke every token the user still holds; returns how many changed
    pub async fn revoke_all_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<usize, AuthError> {
        let mut revoked = 0;
        for record in self.tokens_for_user(user_id).await? {
            if record.revoked_at.is_some() {
                continue;
            }
            let updated = self.revoke(&record.token, now).await?;
            if updated.revoked_at == Some(now) {
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}
