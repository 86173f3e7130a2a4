// ============================
// crates/backend-lib/src/handlers/webhook.rs
// ============================
//! Payment-provider webhook. Only reached through `require_api_key`.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chirpy_common::{WebhookRequest, USER_UPGRADED_EVENT};
use metrics::counter;
use tracing::{debug, info};

use crate::auth::AuthError;
use crate::error::AppError;
use crate::metrics as keys;
use crate::storage::{Storage, UserRepository};
use crate::validation;
use crate::AppState;

/// `POST /api/polka/webhooks`
///
/// Events other than `user.upgraded` are acknowledged and ignored.
pub async fn polka_webhook<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<WebhookRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(request) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    counter!(keys::WEBHOOK_RECEIVED).increment(1);

    if request.event != USER_UPGRADED_EVENT {
        debug!(event = %request.event, "ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = validation::validate_webhook_user_id(&request)?;
    let upgraded = state
        .storage
        .mark_user_upgraded(user_id)
        .await
        .map_err(AuthError::from)?;
    if !upgraded {
        return Err(AppError::NotFound(format!("user {user_id}")));
    }

    info!(%user_id, "user upgraded");
    Ok(StatusCode::NO_CONTENT)
}
