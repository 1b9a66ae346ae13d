//! Browser core
//!
//! [`Browser`] owns the injected [`QueryExecutor`] and exposes every read the
//! HTTP endpoints need: catalog introspection ([`metadata`]), row retrieval and
//! CSV export ([`rows`]) and guarded ad-hoc queries ([`adhoc`]).
//!
//! Nothing here retries or recovers; each failure is returned once to the caller.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::database::traits::{QueryExecutor, Row};
use crate::Error;

pub mod adhoc;
pub mod metadata;
pub mod rows;

/// Row limit for JSON row retrieval when the caller gives none
pub const DEFAULT_ROW_LIMIT: i64 = 100;

/// Row limit for CSV export when the caller gives none
pub const DEFAULT_CSV_LIMIT: i64 = 1000;

/// Entry point for all browsing operations
pub struct Browser<E: QueryExecutor> {
    executor: Arc<E>,
}

impl<E: QueryExecutor> Browser<E> {
    /// Create a browser over the given executor
    pub fn new(executor: E) -> Self {
        Self::from_shared(Arc::new(executor))
    }

    /// Create a browser over an executor that is shared elsewhere too
    pub fn from_shared(executor: Arc<E>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
}

impl<E: QueryExecutor> Clone for Browser<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
        }
    }
}

/// Deserialize a catalog row into its typed form
fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, Error> {
    serde_json::from_value(serde_json::Value::Object(row)).map_err(|error| Error::QueryExecution {
        message: format!("unexpected catalog row: {}", error),
        target: None,
    })
}
