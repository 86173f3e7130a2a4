// ============================
// chirpy-backend-lib/src/lib.rs
// ============================
//! Credential and session-token backend for the Chirpy API server.

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::SessionService;
use crate::clock::Clock;
use crate::config::Settings;
use crate::storage::Storage;

/// Application state shared across all handlers
pub struct AppState<S: ?Sized> {
    /// Login, refresh, revoke and authorization flows
    pub sessions: Arc<SessionService<S>>,
    /// Settings the server was started with
    pub settings: Arc<Settings>,
    /// Storage backend
    pub storage: Arc<S>,
}

impl<S: ?Sized> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            settings: Arc::clone(&self.settings),
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: Storage + ?Sized> AppState<S> {
    /// Create a new application state
    pub fn new(storage: Arc<S>, settings: Settings, clock: Arc<dyn Clock>) -> Self {
        let sessions = Arc::new(SessionService::new(Arc::clone(&storage), &settings, clock));
        Self {
            sessions,
            settings: Arc::new(settings),
            storage,
        }
    }
}
