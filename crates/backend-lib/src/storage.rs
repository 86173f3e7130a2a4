// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Persistence collaborator traits with an in-memory implementation.
use async_trait::async_trait;
use chirpy_common::UserView;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::RefreshToken;

/// Failures reported by a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Stored user row, as seen by the auth core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_chirpy_red: bool,
}

impl UserRecord {
    /// Fields safe to return to clients
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            email: self.email.clone(),
            is_chirpy_red: self.is_chirpy_red,
        }
    }
}

/// Read access to users
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StorageError>;

    /// Flag a user as upgraded. Returns `false` when the user does not exist.
    async fn mark_user_upgraded(&self, id: Uuid) -> Result<bool, StorageError>;
}

/// Refresh-token rows keyed by token string
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Insert a new token. Fails with `Conflict` if the string is taken.
    async fn insert_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, StorageError>;

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StorageError>;

    /// Set `revoked_at` to `at` unless already set, in one atomic step.
    /// Returns the stored record, or `None` if no such token exists.
    async fn revoke_refresh_token(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, StorageError>;

    async fn refresh_tokens_for_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, StorageError>;
}

/// Everything the session service needs from persistence
pub trait Storage: UserRepository + RefreshTokenRepository {}

impl<T: UserRepository + RefreshTokenRepository> Storage for T {}

/// In-memory store backed by sharded maps
#[derive(Clone, Default)]
pub struct MemoryStorage {
    users: Arc<DashMap<Uuid, UserRecord>>,
    emails: Arc<DashMap<String, Uuid>>,
    refresh_tokens: Arc<DashMap<String, RefreshToken>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user with an already-hashed password
    pub fn insert_user(
        &self,
        email: &str,
        hashed_password: &str,
        now: DateTime<Utc>,
    ) -> Result<UserRecord, StorageError> {
        let id = Uuid::new_v4();
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(_) => {
                return Err(StorageError::Conflict(format!("email {email} already registered")));
            },
            Entry::Vacant(slot) => {
                slot.insert(id);
            },
        }

        let user = UserRecord {
            id,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            created_at: now,
            updated_at: now,
            is_chirpy_red: false,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for MemoryStorage {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn mark_user_upgraded(&self, id: Uuid) -> Result<bool, StorageError> {
        match self.users.get_mut(&id) {
            Some(mut user) => {
                user.is_chirpy_red = true;
                user.updated_at = Utc::now();
                Ok(true)
            },
            None => Ok(false),
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryStorage {
    async fn insert_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, StorageError> {
        match self.refresh_tokens.entry(token.token.clone()) {
            Entry::Occupied(_) => {
                Err(StorageError::Conflict("refresh token already exists".to_string()))
            },
            Entry::Vacant(slot) => {
                slot.insert(token.clone());
                Ok(token)
            },
        }
    }

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StorageError> {
        Ok(self.refresh_tokens.get(token).map(|t| t.clone()))
    }

    async fn revoke_refresh_token(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, StorageError> {
        // the shard lock is held for the whole read-modify-write
        let Some(mut record) = self.refresh_tokens.get_mut(token) else {
            return Ok(None);
        };
        if record.revoked_at.is_none() {
            record.revoked_at = Some(at);
            record.updated_at = at;
        }
        Ok(Some(record.clone()))
    }

    async fn refresh_tokens_for_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, StorageError> {
        let mut tokens: Vec<RefreshToken> = self
            .refresh_tokens
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        tokens.sort_by_key(|t| t.created_at);
        Ok(tokens)
    }
}
