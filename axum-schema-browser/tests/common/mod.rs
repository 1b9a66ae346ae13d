//! Shared helpers for the HTTP tests: a recording executor and request plumbing.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use axum_schema_browser::{
    DatabaseError, QueryExecutor, QueryParam, ResultSet, Row, SchemaBrowserLayer,
};
use tower::ServiceExt;

enum Outcome {
    Rows(ResultSet),
    Fails(String),
    TimesOut,
}

/// Executor that remembers every statement and answers with a fixed outcome
#[derive(Clone)]
pub struct SpyExecutor {
    calls: Arc<Mutex<Vec<(String, Vec<QueryParam>)>>>,
    outcome: Arc<Outcome>,
}

impl SpyExecutor {
    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            calls: Arc::default(),
            outcome: Arc::new(outcome),
        }
    }

    pub fn returning(rows: Vec<serde_json::Value>) -> Self {
        Self::with_outcome(Outcome::Rows(rows.into_iter().map(row).collect()))
    }

    /// The database rejects every statement with `message`
    pub fn failing(message: &str) -> Self {
        Self::with_outcome(Outcome::Fails(message.to_string()))
    }

    /// No pooled connection ever becomes available
    pub fn timing_out() -> Self {
        Self::with_outcome(Outcome::TimesOut)
    }

    pub fn calls(&self) -> Vec<(String, Vec<QueryParam>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Mount the browser under `/api`, keeping a handle on the spy
    pub fn router(&self) -> Router {
        SchemaBrowserLayer::new("/api", self.clone()).into_router()
    }
}

#[async_trait]
impl QueryExecutor for SpyExecutor {
    async fn execute(&self, sql: &str, params: &[QueryParam]) -> Result<ResultSet, DatabaseError> {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));

        match self.outcome.as_ref() {
            Outcome::Rows(rows) => Ok(rows.clone()),
            Outcome::Fails(message) => Err(DatabaseError::Query(message.clone())),
            Outcome::TimesOut => Err(DatabaseError::PoolTimeout),
        }
    }
}

pub fn row(value: serde_json::Value) -> Row {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub async fn get(router: Router, uri: &str) -> Response<Body> {
    router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(router: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// POST a raw body with an optional content type
pub async fn post_raw(
    router: Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> Response<Body> {
    let mut request = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        request = request.header("content-type", content_type);
    }

    router
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status for response");
}
