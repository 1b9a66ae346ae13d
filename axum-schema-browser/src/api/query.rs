//! Ad-hoc SQL query endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::debug;

use super::{json_error, log_failure};
use crate::browser::Browser;
use crate::database::traits::QueryExecutor;
use crate::schema::{QueryRequest, QueryResponse};
use crate::Error;

/// Handler for POST /consulta
///
/// Executes caller-supplied SQL that starts with `select`, binding `params`
/// to `$1`, `$2`, ...
///
/// # Security Warning
///
/// The check is on the statement prefix only. Expose this endpoint to trusted
/// internal callers only.
///
/// Request body:
/// ```json
/// { "sql": "SELECT * FROM public.orders WHERE id = $1", "params": [42] }
/// ```
///
/// Response:
/// ```json
/// { "success": true, "total": 1, "dados": [...] }
/// ```
///
/// Unreadable bodies, missing SQL and non-SELECT statements are rejected with
/// 400, database errors with 500.
pub async fn execute_query_handler<E: QueryExecutor>(
    State(browser): State<Browser<E>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = Error::MalformedRequest(rejection.body_text());
            log_failure("ad-hoc query", &error);
            return json_error(&error, None);
        }
    };

    let sql = request.sql.unwrap_or_default();
    let params = request.params.unwrap_or_default();
    debug!(%sql, params = params.len(), "ad-hoc query requested");

    match browser.run_adhoc(&sql, &params).await {
        Ok(dados) => (
            StatusCode::OK,
            Json(QueryResponse {
                success: true,
                total: dados.len(),
                dados,
            }),
        )
            .into_response(),
        Err(error) => {
            log_failure("ad-hoc query", &error);
            json_error(&error, None)
        }
    }
}
