//! Guarded ad-hoc queries
//!
//! The guard is a textual allow-list: the statement must start with `select`
//! after trimming, ignoring case. It is not a SQL parser. A `SELECT ... INTO`
//! still writes, so the endpoint built on this is for trusted callers only.

use tracing::debug;

use super::Browser;
use crate::database::traits::{QueryExecutor, QueryParam, ResultSet};
use crate::Error;

/// Whether `sql` passes the `select`-prefix policy
///
/// Only a normalized copy is inspected; the caller's text is executed as given.
pub fn is_select(sql: &str) -> bool {
    sql.trim().to_lowercase().starts_with("select")
}

impl<E: QueryExecutor> Browser<E> {
    /// Run caller-supplied SQL with positional parameters
    ///
    /// # Errors
    ///
    /// - [`Error::MissingInput`] when `sql` is empty
    /// - [`Error::DisallowedOperation`] when it does not start with `select`
    /// - [`Error::QueryExecution`] when the database rejects it
    pub async fn run_adhoc(&self, sql: &str, params: &[QueryParam]) -> Result<ResultSet, Error> {
        if sql.is_empty() {
            return Err(Error::MissingInput("sql"));
        }

        if !is_select(sql) {
            return Err(Error::DisallowedOperation);
        }

        debug!(params = params.len(), "running ad-hoc query");
        Ok(self.executor.execute(sql, params).await?)
    }
}
