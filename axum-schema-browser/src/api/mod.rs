//! REST API endpoints
//!
//! This module contains all API endpoint handlers for the schema browser.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tracing::{error, warn};

use crate::browser::Browser;
use crate::database::traits::QueryExecutor;
use crate::schema::ErrorResponse;
use crate::Error;

pub mod query;
pub mod rows;
pub mod tables;

// Re-export handlers for convenience
pub use query::execute_query_handler;
pub use rows::{export_csv_handler, get_rows_handler};
pub use tables::{describe_columns_handler, list_objects_handler, list_schemas_handler};

/// Create the API router with all endpoints
///
/// # Arguments
///
/// * `browser` - Browser over the executor every handler shares
///
/// # Returns
///
/// An Axum Router configured with all API routes
pub fn create_api_router<E: QueryExecutor>(browser: Browser<E>) -> Router {
    // Axum 0.8 uses {param} syntax instead of :param
    Router::new()
        .route("/schemas", get(tables::list_schemas_handler::<E>))
        .route("/schema/{schema}/objetos", get(tables::list_objects_handler::<E>))
        .route("/info/{schema}/{view}", get(tables::describe_columns_handler::<E>))
        .route("/dados/{schema}/{objeto}", get(rows::get_rows_handler::<E>))
        .route("/csv/{schema}/{objeto}", get(rows::export_csv_handler::<E>))
        .route("/consulta", post(query::execute_query_handler::<E>))
        .with_state(browser)
}

/// Render an error as the JSON envelope `{success: false, erro, detalhes?}`
///
/// `accessed` names the object a route was reading; server-side failures on
/// such a route carry it in `detalhes` whatever their kind.
pub(crate) fn json_error(error: &Error, accessed: Option<&str>) -> Response {
    let target = match error {
        Error::QueryExecution {
            target: Some(target),
            ..
        } => Some(target.as_str()),
        _ if error.status_code() == StatusCode::INTERNAL_SERVER_ERROR => accessed,
        _ => None,
    };
    let detalhes = target.map(|target| format!("attempted to access {}", target));

    (
        error.status_code(),
        Json(ErrorResponse {
            success: false,
            erro: error.to_string(),
            detalhes,
        }),
    )
        .into_response()
}

/// Render an error as a plain-text body
pub(crate) fn text_error(error: &Error) -> Response {
    (error.status_code(), error.to_string()).into_response()
}

/// Log a failed operation at a level matching who caused it
pub(crate) fn log_failure(operation: &str, error: &Error) {
    if error.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
        error!(operation, %error, "request failed");
    } else {
        warn!(operation, %error, "request rejected");
    }
}
