#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use carelog::config::CarelogConfig;
use carelog::db::{self, Db};
use carelog::google::OAuthTokens;
use carelog::http::{self, AppState};
use carelog::session::SessionStore;
use rusqlite::Connection;
use serde_json::Value;
use tower::ServiceExt;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

pub fn shared_db() -> Db {
    Arc::new(Mutex::new(test_db()))
}

/// Defaults with fixed credentials and no streaming delay.
pub fn test_config() -> CarelogConfig {
    let mut config = CarelogConfig::default();
    config.google.client_id = "test-client".into();
    config.google.client_secret = "test-client-secret".into();
    config.session.secret = "test-secret".into();
    config.tools.stream_echo_delay_ms = 0;
    config
}

/// Router over an in-memory database. The database handle is returned so
/// tests can inspect rows directly.
pub fn test_app(config: CarelogConfig) -> (Router, Db) {
    let db = shared_db();
    let app = http::router(AppState::new(db.clone(), config));
    (app, db)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn post(app: &Router, uri: &str, body: impl Into<String>) -> TestResponse {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

/// `name=value` pair for a `Cookie` request header carrying `tokens`.
pub fn session_cookie(config: &CarelogConfig, tokens: &OAuthTokens) -> String {
    let set_cookie = SessionStore::new(&config.session).save_tokens(tokens).unwrap();
    set_cookie
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

/// `data:` payloads of an SSE body, parsed as JSON.
pub fn sse_events(body: &str) -> Vec<Value> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim()).unwrap())
        .collect()
}
