//! Row retrieval and CSV export endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};

use super::{json_error, log_failure, text_error};
use crate::browser::{Browser, DEFAULT_CSV_LIMIT, DEFAULT_ROW_LIMIT};
use crate::database::traits::QueryExecutor;
use crate::schema::{RowQuery, RowsResponse};

/// Handler for GET /dados/{schema}/{objeto}
///
/// Fetches rows from a table or view.
///
/// Query parameters:
/// - limit: Maximum rows to return (default: 100)
///
/// Response:
/// ```json
/// { "success": true, "schema": "public", "objeto": "orders", "total": 2, "dados": [...] }
/// ```
///
/// On a database error the envelope carries `detalhes` naming the object that
/// was accessed.
pub async fn get_rows_handler<E: QueryExecutor>(
    State(browser): State<Browser<E>>,
    Path((schema, objeto)): Path<(String, String)>,
    Query(query): Query<RowQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(DEFAULT_ROW_LIMIT);

    match browser.fetch_rows(&schema, &objeto, limit).await {
        Ok(dados) => (
            StatusCode::OK,
            Json(RowsResponse {
                success: true,
                total: dados.len(),
                schema,
                objeto,
                dados,
            }),
        )
            .into_response(),
        Err(error) => {
            log_failure("fetch rows", &error);
            json_error(&error, Some(&format!("{}.{}", schema, objeto)))
        }
    }
}

/// Handler for GET /csv/{schema}/{objeto}
///
/// Exports rows of a table or view as a CSV attachment named
/// `{schema}_{objeto}.csv`. Errors are plain text: 400 for invalid names, 404
/// when there are no rows, 500 for database failures.
///
/// Query parameters:
/// - limit: Maximum rows to export (default: 1000)
pub async fn export_csv_handler<E: QueryExecutor>(
    State(browser): State<Browser<E>>,
    Path((schema, objeto)): Path<(String, String)>,
    Query(query): Query<RowQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(DEFAULT_CSV_LIMIT);

    match browser.export_csv(&schema, &objeto, limit).await {
        // Names were validated, so they are safe inside the header value
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}_{}.csv\"", schema, objeto),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(error) => {
            log_failure("export csv", &error);
            text_error(&error)
        }
    }
}
