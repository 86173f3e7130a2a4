// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Login, refresh and revoke endpoints.
use std::{sync::Arc, time::Duration};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chirpy_common::{LoginRequest, LoginResponse, RefreshResponse};

use crate::auth::LoginInput;
use crate::error::AppError;
use crate::storage::Storage;
use crate::validation;
use crate::AppState;

/// `POST /api/login`
pub async fn login<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    validation::validate_login_request(&request)?;

    let input = LoginInput {
        expires_in: request.expires_in_seconds.map(Duration::from_secs),
        email: request.email,
        password: request.password,
    };
    let output = state.sessions.login(input).await?;

    Ok(Json(LoginResponse {
        user: output.user.view(),
        token: output.access_token,
        refresh_token: output.refresh_token.token,
    }))
}

/// `POST /api/refresh`, refresh token in `Authorization: Bearer`
pub async fn refresh<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, AppError> {
    let token = state.sessions.refresh(&headers).await?;
    Ok(Json(RefreshResponse { token }))
}

/// `POST /api/revoke`, refresh token in `Authorization: Bearer`
pub async fn revoke<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    state.sessions.revoke(&headers).await?;
    Ok(StatusCode::NO_CONTENT)
}
