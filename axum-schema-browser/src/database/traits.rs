//! Query executor trait
//!
//! This trait is the single seam between the browser core and a database.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// One result row: column name to value, in the order the query returned them
///
/// Relies on serde_json's `preserve_order` feature so column order survives
/// into JSON and CSV output.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// All rows returned by a statement
pub type ResultSet = Vec<Row>;

/// Executes parameterized SQL and returns rows as ordered JSON maps
///
/// Placeholders (`$1`, `$2`, ...) stand for values only. Identifiers must
/// already be part of `sql`; see [`crate::identifier`].
#[async_trait]
pub trait QueryExecutor: Send + Sync + 'static {
    /// Run `sql` with `params` bound positionally
    ///
    /// # Arguments
    ///
    /// * `sql` - Statement text with `$n` placeholders
    /// * `params` - Values for the placeholders, in order
    ///
    /// # Returns
    ///
    /// Every row produced by the statement
    async fn execute(&self, sql: &str, params: &[QueryParam]) -> Result<ResultSet, DatabaseError>;
}

/// A value bound to a placeholder
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum QueryParam {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Arrays and objects, bound as `jsonb`
    Json(serde_json::Value),
}

impl From<serde_json::Value> for QueryParam {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => QueryParam::Null,
            serde_json::Value::Bool(value) => QueryParam::Bool(value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(integer) => QueryParam::Int(integer),
                // u64 beyond i64::MAX lands here too
                None => number
                    .as_f64()
                    .map(QueryParam::Float)
                    .unwrap_or_else(|| QueryParam::String(number.to_string())),
            },
            serde_json::Value::String(value) => QueryParam::String(value),
            other => QueryParam::Json(other),
        }
    }
}

impl From<i64> for QueryParam {
    fn from(value: i64) -> Self {
        QueryParam::Int(value)
    }
}

impl From<&str> for QueryParam {
    fn from(value: &str) -> Self {
        QueryParam::String(value.to_string())
    }
}

/// Database error type
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The statement was rejected or failed while running
    #[error("{0}")]
    Query(String),

    /// No pooled connection became available within the acquire timeout
    #[error("timed out waiting for a database connection")]
    PoolTimeout,

    /// The database could not be reached
    #[error("database connection failed: {0}")]
    Connection(String),

    /// A returned value could not be converted
    #[error("failed to decode column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            // Pass the server's own message through untouched
            sqlx::Error::Database(database_error) => {
                DatabaseError::Query(database_error.message().to_string())
            }
            sqlx::Error::PoolTimedOut => DatabaseError::PoolTimeout,
            sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_) => DatabaseError::Connection(error.to_string()),
            sqlx::Error::ColumnDecode { index, source } => DatabaseError::Decode {
                column: index,
                message: source.to_string(),
            },
            other => DatabaseError::Query(other.to_string()),
        }
    }
}
