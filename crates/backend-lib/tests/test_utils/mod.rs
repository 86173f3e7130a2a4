//! Shared setup for the router-level tests.
//!
//! Builds an app over `MemoryStorage` with a `ManualClock`, seeded with a
//! single user, so tests can drive expiry without sleeping.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, Request, Response},
    Router,
};
use backend_lib::{
    auth::MIN_PASSWORD_COST,
    clock::{Clock, ManualClock},
    config::Settings,
    router::create_router,
    storage::{MemoryStorage, UserRecord},
    AppState,
};
use std::sync::Arc;
use tower::ServiceExt;

pub const EMAIL: &str = "walt@breakingbad.com";
pub const PASSWORD: &str = "04234";
pub const TOKEN_SECRET: &str = "integration-secret";
pub const SERVICE_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub app: Router,
    pub state: Arc<AppState<MemoryStorage>>,
    pub storage: Arc<MemoryStorage>,
    pub clock: ManualClock,
    pub user: UserRecord,
}

pub async fn setup_test_app() -> TestApp {
    let settings = Settings {
        token_secret: TOKEN_SECRET.to_string(),
        service_api_key: SERVICE_KEY.to_string(),
        password_cost: MIN_PASSWORD_COST,
        ..Settings::default()
    };
    let clock = ManualClock::default();
    let storage = Arc::new(MemoryStorage::new());
    let state = Arc::new(AppState::new(
        Arc::clone(&storage),
        settings,
        Arc::new(clock.clone()),
    ));

    let hashed = state
        .sessions
        .hash_password(PASSWORD.to_string())
        .await
        .expect("hash seed password");
    let user = storage
        .insert_user(EMAIL, &hashed, clock.now())
        .expect("seed user");

    TestApp {
        app: create_router(Arc::clone(&state)),
        state,
        storage,
        clock,
        user,
    }
}

/// Send one request through a clone of the router
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("router is infallible")
}

pub fn post_json(uri: &str, body: &serde_json::Value, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn post_empty(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(Body::empty()).expect("request")
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Log in as the seeded user, returning `(access_token, refresh_token)`
pub async fn login(app: &Router) -> (String, String) {
    let response = send(
        app,
        post_json(
            "/api/login",
            &serde_json::json!({ "email": EMAIL, "password": PASSWORD }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    (
        body["token"].as_str().expect("token").to_string(),
        body["refresh_token"].as_str().expect("refresh_token").to_string(),
    )
}
