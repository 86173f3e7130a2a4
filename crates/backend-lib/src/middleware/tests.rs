use super::*;
use crate::auth::AccessTokenIssuer;
use crate::clock::ManualClock;
use crate::config::Settings;
use crate::storage::MemoryStorage;
use crate::AppState;
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request, StatusCode},
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "middleware-secret";
const SERVICE_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

fn test_state(clock: &ManualClock) -> Arc<AppState<MemoryStorage>> {
    let settings = Settings {
        token_secret: SECRET.to_string(),
        service_api_key: SERVICE_KEY.to_string(),
        ..Settings::default()
    };
    Arc::new(AppState::new(
        Arc::new(MemoryStorage::new()),
        settings,
        Arc::new(clock.clone()),
    ))
}

async fn whoami(AuthUser(user_id): AuthUser) -> String {
    user_id.to_string()
}

async fn accepted() -> StatusCode {
    StatusCode::NO_CONTENT
}

fn protected_app(state: Arc<AppState<MemoryStorage>>) -> Router {
    Router::new().route("/me", get(whoami)).with_state(state)
}

fn webhook_app(state: Arc<AppState<MemoryStorage>>) -> Router {
    Router::new()
        .route("/hook", post(accepted))
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            require_api_key::<MemoryStorage>,
        ))
        .with_state(state)
}

fn request(method: &str, uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_auth_user_accepts_valid_token() {
    let clock = ManualClock::default();
    let state = test_state(&clock);
    let user_id = Uuid::new_v4();
    let token = AccessTokenIssuer::new(Arc::new(clock.clone()))
        .issue(user_id, SECRET, Duration::from_secs(60))
        .unwrap();

    let response = protected_app(state)
        .oneshot(request("GET", "/me", Some(&format!("Bearer {token}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(body, user_id.to_string().as_bytes());
}

#[tokio::test]
async fn test_auth_user_rejects_missing_and_forged_tokens() {
    let clock = ManualClock::default();
    let app = protected_app(test_state(&clock));

    let response = app.clone().oneshot(request("GET", "/me", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let forged = AccessTokenIssuer::new(Arc::new(clock.clone()))
        .issue(Uuid::new_v4(), "other-secret", Duration::from_secs(60))
        .unwrap();
    let response = app
        .oneshot(request("GET", "/me", Some(&format!("Bearer {forged}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_user_rejects_expired_token() {
    let clock = ManualClock::default();
    let app = protected_app(test_state(&clock));
    let token = AccessTokenIssuer::new(Arc::new(clock.clone()))
        .issue(Uuid::new_v4(), SECRET, Duration::from_secs(60))
        .unwrap();

    clock.advance(chrono::Duration::seconds(61));

    let response = app
        .oneshot(request("GET", "/me", Some(&format!("Bearer {token}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_require_api_key() {
    let clock = ManualClock::default();
    let app = webhook_app(test_state(&clock));

    let response = app
        .clone()
        .oneshot(request("POST", "/hook", Some(&format!("ApiKey {SERVICE_KEY}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Wrong key
    let response = app
        .clone()
        .oneshot(request("POST", "/hook", Some("ApiKey nope")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Right key, wrong scheme
    let response = app
        .clone()
        .oneshot(request("POST", "/hook", Some(&format!("Bearer {SERVICE_KEY}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.oneshot(request("POST", "/hook", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
