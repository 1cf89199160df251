#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use job_board::{
    AppConfig, AppState, Argon2Hasher, InMemoryRepository, create_router,
    repository::RepositoryState,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Argon2 at minimum cost keeps suites that register many users fast.
pub fn cheap_hasher() -> Argon2Hasher {
    Argon2Hasher::with_params(1024, 1, 1).unwrap()
}

/// Fresh state over an empty in-memory store. The store handle is returned alongside so
/// tests can inspect it directly.
pub fn test_state() -> (Arc<InMemoryRepository>, AppState) {
    let store = Arc::new(InMemoryRepository::new());
    let repo: RepositoryState = store.clone();
    let state = AppState::new(repo, Arc::new(cheap_hasher()), AppConfig::default());
    (store, state)
}

pub fn test_app() -> (Arc<InMemoryRepository>, Router) {
    let (store, state) = test_state();
    (store, create_router(state))
}

/// Drives one request through the router and decodes the JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Registers a user and returns its access token.
pub async fn register(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(serde_json::json!({ "name": name, "email": email, "password": "Abcdef1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}

/// Registers a user and attaches an Employer profile, returning its access token.
pub async fn register_employer(app: &Router, email: &str) -> String {
    let token = register(app, "Boss", email).await;
    let (status, body) = send(
        app,
        "POST",
        "/profiles/profile/employer",
        Some(&token),
        Some(serde_json::json!({
            "name": "Boss",
            "company_name": "Acme",
            "address": "1 Main St, Boston, MA",
            "contact_number": "555-0100",
            "email": email,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "employer profile failed: {body}");
    token
}

/// Posts a job as `token` and returns its id.
pub async fn post_job(app: &Router, token: &str, title: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/jobs/post",
        Some(token),
        Some(serde_json::json!({ "title": title, "description": "Build things", "location": "Remote" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "post job failed: {body}");
    body["id"].as_i64().unwrap()
}
