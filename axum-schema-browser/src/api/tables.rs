//! Schema, object and column listing endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use super::{json_error, log_failure};
use crate::browser::Browser;
use crate::database::traits::QueryExecutor;
use crate::schema::{ColumnsResponse, ObjectsResponse, SchemasResponse};

/// Handler for GET /schemas
///
/// Returns every schema except the PostgreSQL system ones, sorted by name.
///
/// Response:
/// ```json
/// { "success": true, "schemas": ["public", "sales"] }
/// ```
pub async fn list_schemas_handler<E: QueryExecutor>(State(browser): State<Browser<E>>) -> Response {
    match browser.list_schemas().await {
        Ok(schemas) => (
            StatusCode::OK,
            Json(SchemasResponse {
                success: true,
                schemas,
            }),
        )
            .into_response(),
        Err(error) => {
            log_failure("list schemas", &error);
            json_error(&error, None)
        }
    }
}

/// Handler for GET /schema/{schema}/objetos
///
/// Lists the tables and views of a schema.
///
/// Response:
/// ```json
/// {
///   "success": true,
///   "schema": "public",
///   "objetos": [{ "table_name": "orders", "table_type": "BASE TABLE", "tipo": "table" }]
/// }
/// ```
///
/// # Arguments
///
/// * `browser` - Browser from state
/// * `schema` - Schema name, rejected with 400 unless it is a plain identifier
pub async fn list_objects_handler<E: QueryExecutor>(
    State(browser): State<Browser<E>>,
    Path(schema): Path<String>,
) -> Response {
    match browser.list_objects(&schema).await {
        Ok(objetos) => (
            StatusCode::OK,
            Json(ObjectsResponse {
                success: true,
                schema,
                objetos,
            }),
        )
            .into_response(),
        Err(error) => {
            log_failure("list objects", &error);
            json_error(&error, None)
        }
    }
}

/// Handler for GET /info/{schema}/{view}
///
/// Describes the columns of a view (or table): name, data type, nullability
/// and default, in ordinal order. An unknown object gives an empty list.
pub async fn describe_columns_handler<E: QueryExecutor>(
    State(browser): State<Browser<E>>,
    Path((schema, view)): Path<(String, String)>,
) -> Response {
    match browser.describe_columns(&schema, &view).await {
        Ok(colunas) => (
            StatusCode::OK,
            Json(ColumnsResponse {
                success: true,
                schema,
                view,
                colunas,
            }),
        )
            .into_response(),
        Err(error) => {
            log_failure("describe columns", &error);
            json_error(&error, None)
        }
    }
}
