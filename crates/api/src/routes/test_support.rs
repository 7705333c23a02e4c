//! Router harness shared by route tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use untether_core::roundup::{RepositoryError, RoundupRecord, RoundupRepository};
use untether_db::InMemoryRoundupRepository;
use untether_shared::config::RoundupConfig;
use untether_shared::types::{RoundupId, UserId};

use crate::{AppState, create_router};

/// Router over a fresh in-memory repository, plus a handle to that repository.
pub fn in_memory_app() -> (Router, Arc<InMemoryRoundupRepository>) {
    let repo = Arc::new(InMemoryRoundupRepository::new());
    let state = AppState::new(repo.clone(), RoundupConfig::default());
    (create_router(state), repo)
}

/// Router whose repository fails every call.
pub fn failing_app() -> Router {
    create_router(AppState::new(
        Arc::new(FailingRepository),
        RoundupConfig::default(),
    ))
}

/// Sends a JSON request and decodes the JSON response.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_raw(app, method, uri, &body.to_string()).await
}

/// Sends a raw body with a JSON content type.
pub async fn send_raw(
    app: Router,
    method: &str,
    uri: &str,
    body: &str,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    dispatch(app, request).await
}

/// Sends a bodiless request.
pub async fn send_empty(app: Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    dispatch(app, request).await
}

async fn dispatch(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Asserts that a JSON number is within 1e-4 of `expected`.
#[allow(clippy::float_arithmetic)]
pub fn assert_close(actual: &serde_json::Value, expected: f64) {
    let actual = actual
        .as_f64()
        .unwrap_or_else(|| panic!("expected a number, got {actual}"));
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

struct FailingRepository;

fn unavailable() -> RepositoryError {
    RepositoryError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl RoundupRepository for FailingRepository {
    async fn insert(&self, _record: RoundupRecord) -> Result<(), RepositoryError> {
        Err(unavailable())
    }

    async fn insert_many(&self, _records: Vec<RoundupRecord>) -> Result<(), RepositoryError> {
        Err(unavailable())
    }

    async fn list_by_user(
        &self,
        _user_id: UserId,
        _limit: u64,
        _offset: u64,
    ) -> Result<Vec<RoundupRecord>, RepositoryError> {
        Err(unavailable())
    }

    async fn list_by_user_between(
        &self,
        _user_id: UserId,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<RoundupRecord>, RepositoryError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: RoundupId, _user_id: UserId) -> Result<bool, RepositoryError> {
        Err(unavailable())
    }
}
