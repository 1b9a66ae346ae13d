//! # axum-schema-browser
//!
//! Browse the schemas, tables and views of a PostgreSQL database over HTTP,
//! easily integrable as an Axum layer.
//!
//! ## Features
//!
//! - Schema, table and view discovery through the information schema
//! - Row retrieval from any table or view as JSON, with a row limit
//! - CSV export of the same rows (e.g. for spreadsheet imports)
//! - Column metadata for a table or view
//! - Ad-hoc `SELECT` queries with bound parameters
//!
//! ## Security Warning
//!
//! - No authentication/authorization built-in
//! - Exposes full database schema and data
//! - The ad-hoc query endpoint only checks that the text starts with `select`.
//!   That is not a read-only guarantee (`SELECT ... INTO` creates a table).
//!   Mount it for trusted, internal callers only, ideally with a read-only
//!   database role.
//!
//! Schema and object names are spliced into SQL text because drivers cannot
//! bind identifiers. They are accepted only when they match
//! `^[A-Za-z_][A-Za-z0-9_]*$`, see [`identifier`].
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use axum_schema_browser::SchemaBrowserLayer;
//! use sqlx::PgPool;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = PgPool::connect("postgres://localhost/app")
//!         .await
//!         .unwrap();
//!
//!     let app = Router::new()
//!         .route("/", get(|| async { "Hello, World!" }))
//!         .merge(SchemaBrowserLayer::postgres("/api", pool).into_router());
//!
//!     // Serve the application...
//! }
//! ```

// Public modules
pub mod api;
pub mod browser;
pub mod csv;
pub mod database;
pub mod identifier;
pub mod layer;
pub mod schema;

// Public exports
pub use browser::{Browser, DEFAULT_CSV_LIMIT, DEFAULT_ROW_LIMIT};
pub use identifier::{is_valid_identifier, QualifiedName};
pub use layer::SchemaBrowserLayer;
pub use schema::{ColumnDescription, ObjectKind, SchemaObject};

// Re-export the executor seam
pub use database::traits::{DatabaseError, QueryExecutor, QueryParam, ResultSet, Row};

#[cfg(feature = "postgres")]
pub use database::postgres::PostgresExecutor;

use axum::http::StatusCode;
use thiserror::Error;

/// Everything a browser operation can fail with
#[derive(Debug, Error)]
pub enum Error {
    /// A schema or object name does not match the identifier grammar
    #[error("invalid schema or object name: {0:?}")]
    InvalidIdentifier(String),

    /// A required request field is absent or empty
    #[error("missing required field: {0}")]
    MissingInput(&'static str),

    /// The request body could not be read as the expected JSON
    #[error("invalid request body: {0}")]
    MalformedRequest(String),

    /// Ad-hoc SQL that does not start with `select`
    #[error("only SELECT queries are allowed")]
    DisallowedOperation,

    /// The statement succeeded but produced nothing to export
    #[error("no data found")]
    NoData,

    /// The database rejected the statement; `message` is its own wording
    #[error("{message}")]
    QueryExecution {
        message: String,
        /// `schema.object` when the failing statement targeted one
        target: Option<String>,
    },

    /// No pooled connection became available in time
    #[error("timed out waiting for a database connection")]
    PoolTimeout,

    /// The database could not be reached
    #[error("database connection failed: {0}")]
    Connection(String),
}

impl Error {
    /// HTTP status the boundary should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidIdentifier(_)
            | Error::MissingInput(_)
            | Error::MalformedRequest(_)
            | Error::DisallowedOperation => StatusCode::BAD_REQUEST,
            Error::NoData => StatusCode::NOT_FOUND,
            Error::QueryExecution { .. } | Error::PoolTimeout | Error::Connection(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Lift an executor failure, remembering which object the statement targeted
    pub(crate) fn from_database(error: DatabaseError, target: Option<&QualifiedName>) -> Self {
        match error {
            DatabaseError::PoolTimeout => Error::PoolTimeout,
            DatabaseError::Connection(message) => Error::Connection(message),
            error @ (DatabaseError::Query(_) | DatabaseError::Decode { .. }) => {
                Error::QueryExecution {
                    message: error.to_string(),
                    target: target.map(ToString::to_string),
                }
            }
        }
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Self {
        Error::from_database(error, None)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
