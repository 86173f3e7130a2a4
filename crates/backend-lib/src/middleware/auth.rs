use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::storage::Storage;
use crate::{error::AppError, AppState};

/// Caller identity taken from a valid `Bearer` access token.
///
/// Handlers that take an `AuthUser` argument reject the request with 401
/// before running when the token is absent, malformed, forged or expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

impl<S> FromRequestParts<Arc<AppState<S>>> for AuthUser
where
    S: Storage + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let user_id = state.sessions.authorize(&parts.headers)?;
        Ok(AuthUser(user_id))
    }
}

/// Webhook guard: the request must carry `Authorization: ApiKey <key>`
/// matching the configured service key.
pub async fn require_api_key<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Err(e) = state.sessions.authorize_service(request.headers()) {
        debug!(path = %request.uri().path(), "service key rejected");
        return Err(e.into());
    }

    Ok(next.run(request).await)
}
