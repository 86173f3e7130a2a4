// ============================
// chirpy-backend-lib/src/router.rs
// ============================
//! HTTP router for the auth endpoints.
use crate::handlers::{self, auth, webhook};
use crate::middleware::require_api_key;
use crate::storage::Storage;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router<S: Storage + 'static>(state: Arc<AppState<S>>) -> Router {
    let webhooks = Router::new()
        .route("/api/polka/webhooks", post(webhook::polka_webhook::<S>))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_api_key::<S>,
        ));

    Router::new()
        .route("/api/healthz", get(handlers::healthz))
        .route("/api/login", post(auth::login::<S>))
        .route("/api/refresh", post(auth::refresh::<S>))
        .route("/api/revoke", post(auth::revoke::<S>))
        .merge(webhooks)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
