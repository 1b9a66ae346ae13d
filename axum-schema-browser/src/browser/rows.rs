//! Row retrieval from a caller-named table or view

use tracing::debug;

use super::Browser;
use crate::csv;
use crate::database::traits::{QueryExecutor, QueryParam, ResultSet};
use crate::identifier::{self, QualifiedName};
use crate::Error;

impl<E: QueryExecutor> Browser<E> {
    /// Fetch up to `limit` rows from `schema.object`
    ///
    /// Both names are validated before any SQL is built; the limit is always a
    /// bound parameter. Rows come back exactly as the executor produced them.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidIdentifier`] for a bad name, with no query issued
    /// - [`Error::QueryExecution`] with `target` set to `schema.object` when the
    ///   database rejects the statement
    pub async fn fetch_rows(
        &self,
        schema: &str,
        object: &str,
        limit: i64,
    ) -> Result<ResultSet, Error> {
        let target = QualifiedName::new(schema, object)?;
        let sql = identifier::select_all_with_limit(&target);

        let rows = self
            .executor
            .execute(&sql, &[QueryParam::Int(limit)])
            .await
            .map_err(|error| Error::from_database(error, Some(&target)))?;

        debug!(object = %target, limit, rows = rows.len(), "fetched rows");
        Ok(rows)
    }

    /// Fetch rows like [`Browser::fetch_rows`] and render them as CSV
    ///
    /// Zero rows is [`Error::NoData`] rather than an empty document.
    pub async fn export_csv(&self, schema: &str, object: &str, limit: i64) -> Result<String, Error> {
        let rows = self.fetch_rows(schema, object, limit).await?;
        csv::to_csv(&rows)
    }
}
