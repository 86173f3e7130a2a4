// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Login, refresh, revoke and authorization flows.
//!
//! Refresh-token states: `Active` -> `Expired` (derived from `expires_at`)
//! -> `Revoked` (terminal). An expired token presented for refresh is
//! revoked on the spot so later attempts report it as revoked.
use axum::http::HeaderMap;
use metrics::counter;
use std::{sync::Arc, time::Duration};
use subtle::ConstantTimeEq;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use zeroize::Zeroize;

use super::{
    extract_api_key, extract_bearer, hash_password_secure, AccessTokenIssuer, AuthError,
    PasswordCredential, RefreshToken, RefreshTokenStore, TokenState,
};
use crate::clock::Clock;
use crate::config::Settings;
use crate::metrics as keys;
use crate::storage::{Storage, UserRecord};

const DECOY_PASSWORD: &str = "chirpy-decoy-password";

/// Credentials presented at login
pub struct LoginInput {
    pub email: String,
    pub password: String,
    /// Requested access-token lifetime; clamped to one hour
    pub expires_in: Option<Duration>,
}

impl Drop for LoginInput {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// Result of a successful login
#[derive(Debug)]
pub struct LoginOutput {
    pub access_token: String,
    pub refresh_token: RefreshToken,
    pub user: UserRecord,
}

/// Composes password checks, access tokens and refresh tokens
pub struct SessionService<R: ?Sized> {
    repo: Arc<R>,
    passwords: PasswordCredential,
    issuer: AccessTokenIssuer,
    refresh_tokens: RefreshTokenStore<R>,
    clock: Arc<dyn Clock>,
    token_secret: String,
    service_api_key: String,
    access_token_ttl: Duration,
    /// Digest verified against when the email is unknown, built on first use
    decoy_digest: OnceCell<String>,
}

impl<R: Storage + ?Sized> SessionService<R> {
    pub fn new(repo: Arc<R>, settings: &Settings, clock: Arc<dyn Clock>) -> Self {
        Self {
            refresh_tokens: RefreshTokenStore::with_ttl(Arc::clone(&repo), settings.refresh_token_ttl()),
            repo,
            passwords: settings.password_credential(),
            issuer: AccessTokenIssuer::new(Arc::clone(&clock)),
            clock,
            token_secret: settings.token_secret.clone(),
            service_api_key: settings.service_api_key.clone(),
            access_token_ttl: settings.access_token_ttl(),
            decoy_digest: OnceCell::new(),
        }
    }

    pub fn refresh_tokens(&self) -> &RefreshTokenStore<R> {
        &self.refresh_tokens
    }

    /// Hash a password off the async runtime
    pub async fn hash_password(&self, mut plain: String) -> Result<String, AuthError> {
        let passwords = self.passwords;
        tokio::task::spawn_blocking(move || hash_password_secure(&passwords, &mut plain))
            .await
            .map_err(|e| AuthError::HashFailure(format!("hashing task: {e}")))?
    }

    async fn verify_password(&self, digest: &str, plain: &str) -> Result<(), AuthError> {
        let passwords = self.passwords;
        let digest = digest.to_string();
        let mut plain = plain.to_string();
        tokio::task::spawn_blocking(move || {
            let verified = passwords.verify(&digest, &plain);
            plain.zeroize();
            verified
        })
        .await
        .map_err(|e| AuthError::HashFailure(format!("verification task: {e}")))?
    }

    /// Verify email and password, then issue an access token and a new
    /// refresh token. Unknown email and wrong password fail identically.
    #[instrument(skip_all)]
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutput, AuthError> {
        let Some(user) = self.repo.find_user_by_email(&input.email).await? else {
            // same scrypt work as a wrong password
            let decoy = self
                .decoy_digest
                .get_or_try_init(|| self.hash_password(DECOY_PASSWORD.to_string()))
                .await?;
            let _ = self.verify_password(decoy, &input.password).await;
            counter!(keys::LOGIN_FAILED).increment(1);
            debug!("login rejected: unknown email");
            return Err(AuthError::CredentialMismatch);
        };

        if let Err(e) = self.verify_password(&user.hashed_password, &input.password).await {
            counter!(keys::LOGIN_FAILED).increment(1);
            debug!(user_id = %user.id, "login rejected: {e}");
            return Err(e);
        }

        let ttl = input.expires_in.unwrap_or(self.access_token_ttl);
        let access_token = self.issuer.issue(user.id, &self.token_secret, ttl)?;
        counter!(keys::ACCESS_TOKEN_ISSUED).increment(1);

        let refresh_token = self.refresh_tokens.create(user.id, self.clock.now()).await?;
        counter!(keys::REFRESH_TOKEN_CREATED).increment(1);
        counter!(keys::LOGIN_SUCCEEDED).increment(1);
        info!(user_id = %user.id, "login succeeded");

        Ok(LoginOutput {
            access_token,
            refresh_token,
            user,
        })
    }

    /// Exchange a bearer refresh token for a new access token.
    /// The refresh token itself is left in place.
    #[instrument(skip_all)]
    pub async fn refresh(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        let presented = extract_bearer(headers)?;
        let record = self.refresh_tokens.lookup(&presented).await.inspect_err(|_| {
            counter!(keys::REFRESH_REJECTED).increment(1);
        })?;
        let now = self.clock.now();

        match record.state(now) {
            TokenState::Revoked => {
                counter!(keys::REFRESH_REJECTED).increment(1);
                debug!(user_id = %record.user_id, "refresh with revoked token");
                Err(AuthError::TokenRevoked)
            },
            TokenState::Expired => {
                self.refresh_tokens.revoke(&record.token, now).await?;
                counter!(keys::REFRESH_TOKEN_REVOKED).increment(1);
                counter!(keys::REFRESH_REJECTED).increment(1);
                info!(user_id = %record.user_id, "expired refresh token revoked");
                Err(AuthError::TokenExpired)
            },
            TokenState::Active => {
                let token = self
                    .issuer
                    .issue(record.user_id, &self.token_secret, self.access_token_ttl)?;
                counter!(keys::ACCESS_TOKEN_ISSUED).increment(1);
                debug!(user_id = %record.user_id, "access token refreshed");
                Ok(token)
            },
        }
    }

    /// Revoke the bearer refresh token. Revoking an already revoked token
    /// succeeds.
    #[instrument(skip_all)]
    pub async fn revoke(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let presented = extract_bearer(headers)?;
        let record = self.refresh_tokens.lookup(&presented).await?;
        self.refresh_tokens.revoke(&record.token, self.clock.now()).await?;
        counter!(keys::REFRESH_TOKEN_REVOKED).increment(1);
        info!(user_id = %record.user_id, "refresh token revoked");
        Ok(())
    }

    /// Revoke every refresh token a user holds, e.g. after a password change
    #[instrument(skip(self))]
    pub async fn revoke_all_sessions(&self, user_id: Uuid) -> Result<usize, AuthError> {
        let revoked = self
            .refresh_tokens
            .revoke_all_for_user(user_id, self.clock.now())
            .await?;
        counter!(keys::REFRESH_TOKEN_REVOKED).increment(revoked as u64);
        info!(revoked, "sessions revoked");
        Ok(revoked)
    }

    /// Validate a raw access token
    pub fn validate_access_token(&self, token: &str) -> Result<Uuid, AuthError> {
        self.issuer.validate(token, &self.token_secret)
    }

    /// Resolve the caller of a protected endpoint from its bearer access
    /// token. Any failure is reported as `Unauthorized`.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<Uuid, AuthError> {
        let token = extract_bearer(headers).map_err(|_| AuthError::Unauthorized)?;
        self.validate_access_token(&token).map_err(|_| {
            warn!("rejected access token");
            AuthError::Unauthorized
        })
    }

    /// Check the static service key sent by the webhook caller
    pub fn authorize_service(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let key = extract_api_key(headers).map_err(|_| AuthError::Unauthorized)?;
        let matches: bool = key.as_bytes().ct_eq(self.service_api_key.as_bytes()).into();
        if !matches {
            warn!("rejected service api key");
            return Err(AuthError::Unauthorized);
        }
        Ok(())
    }
}
