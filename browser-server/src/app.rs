//! Application router: liveness routes plus the mounted schema browser

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use axum_schema_browser::{Browser, QueryExecutor, SchemaBrowserLayer};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

/// Build the full application router
///
/// The browser endpoints live under `base_path`; `/` and `/health` stay at the
/// root. The browser router brings its own CORS layer, so only the root routes
/// get one here.
pub fn build_app<E: QueryExecutor>(base_path: &str, browser: Browser<E>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler::<E>))
        .with_state(browser.clone())
        .layer(CorsLayer::permissive())
        .merge(SchemaBrowserLayer::with_browser(base_path, browser).into_router())
        .layer(TraceLayer::new_for_http())
}

async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "schema browser is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn health_handler<E: QueryExecutor>(
    State(browser): State<Browser<E>>,
) -> Result<(StatusCode, &'static str), StatusCode> {
    // Round-trip to the database through the same guarded path as any query
    browser.run_adhoc("SELECT 1", &[]).await.map_err(|error| {
        warn!(%error, "health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok((StatusCode::OK, "ok"))
}
