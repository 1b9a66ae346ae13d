//! Catalog introspection: schemas, tables/views and columns

use serde::Deserialize;
use tracing::debug;

use super::{from_row, Browser};
use crate::database::traits::{QueryExecutor, QueryParam};
use crate::identifier;
use crate::schema::{ColumnDescription, ObjectKind, SchemaObject};
use crate::Error;

/// Catalog schemas that are never listed
pub const SYSTEM_SCHEMAS: [&str; 3] = ["information_schema", "pg_catalog", "pg_toast"];

// Catalog columns are domain types; `::text` keeps them plain strings for the driver.

const LIST_SCHEMAS_SQL: &str = r#"
    SELECT schema_name::text AS schema_name
    FROM information_schema.schemata
    WHERE schema_name NOT IN ('information_schema', 'pg_catalog', 'pg_toast')
    ORDER BY schema_name
"#;

const LIST_OBJECTS_SQL: &str = r#"
    SELECT
        table_name::text AS table_name,
        table_type::text AS table_type
    FROM information_schema.tables
    WHERE table_schema = $1
    ORDER BY table_type, table_name
"#;

const DESCRIBE_COLUMNS_SQL: &str = r#"
    SELECT
        column_name::text AS column_name,
        data_type::text AS data_type,
        is_nullable::text AS is_nullable,
        column_default::text AS column_default
    FROM information_schema.columns
    WHERE table_schema = $1 AND table_name = $2
    ORDER BY ordinal_position
"#;

#[derive(Deserialize)]
struct SchemaRow {
    schema_name: String,
}

#[derive(Deserialize)]
struct ObjectRow {
    table_name: String,
    table_type: String,
}

impl<E: QueryExecutor> Browser<E> {
    /// List user-visible schemas in alphabetical order
    ///
    /// `information_schema`, `pg_catalog` and `pg_toast` are never returned.
    pub async fn list_schemas(&self) -> Result<Vec<String>, Error> {
        let rows = self.executor.execute(LIST_SCHEMAS_SQL, &[]).await?;

        let mut schemas = rows
            .into_iter()
            .map(|row| from_row::<SchemaRow>(row).map(|row| row.schema_name))
            .collect::<Result<Vec<_>, _>>()?;

        schemas.retain(|name| !SYSTEM_SCHEMAS.contains(&name.as_str()));
        schemas.sort();

        debug!(count = schemas.len(), "listed schemas");
        Ok(schemas)
    }

    /// List the tables and views of `schema`, ordered by type then name
    ///
    /// An invalid schema name fails before any query runs.
    pub async fn list_objects(&self, schema: &str) -> Result<Vec<SchemaObject>, Error> {
        identifier::validate(schema)?;

        let rows = self
            .executor
            .execute(LIST_OBJECTS_SQL, &[QueryParam::from(schema)])
            .await?;

        rows.into_iter()
            .map(|row| -> Result<SchemaObject, Error> {
                let ObjectRow {
                    table_name,
                    table_type,
                } = from_row(row)?;

                Ok(SchemaObject {
                    tipo: ObjectKind::from_table_type(&table_type),
                    table_name,
                    table_type,
                })
            })
            .collect()
    }

    /// Describe the columns of a table or view in ordinal order
    ///
    /// Both names are bound as values, but they are validated like everywhere
    /// else so invalid names get the same client error on every route. An
    /// unknown object yields an empty list.
    pub async fn describe_columns(
        &self,
        schema: &str,
        object: &str,
    ) -> Result<Vec<ColumnDescription>, Error> {
        identifier::validate(schema)?;
        identifier::validate(object)?;

        let rows = self
            .executor
            .execute(
                DESCRIBE_COLUMNS_SQL,
                &[QueryParam::from(schema), QueryParam::from(object)],
            )
            .await?;

        rows.into_iter().map(from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::{row, Outcome, RecordingExecutor};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn list_schemas_drops_system_schemas_and_sorts() {
        let browser = Browser::new(RecordingExecutor::returning(vec![
            row(json!({"schema_name": "sales"})),
            row(json!({"schema_name": "pg_catalog"})),
            row(json!({"schema_name": "analytics"})),
            row(json!({"schema_name": "information_schema"})),
            row(json!({"schema_name": "pg_toast"})),
            row(json!({"schema_name": "public"})),
        ]));

        let schemas = browser.list_schemas().await.unwrap();

        assert_eq!(schemas, vec!["analytics", "public", "sales"]);
        let calls = browser.executor().calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1.is_empty());
    }

    #[tokio::test]
    async fn list_objects_binds_schema_and_classifies_views() {
        let browser = Browser::new(RecordingExecutor::returning(vec![
            row(json!({"table_name": "orders", "table_type": "BASE TABLE"})),
            row(json!({"table_name": "order_totals", "table_type": "VIEW"})),
        ]));

        let objects = browser.list_objects("public").await.unwrap();

        assert_eq!(
            objects,
            vec![
                SchemaObject {
                    table_name: "orders".to_string(),
                    table_type: "BASE TABLE".to_string(),
                    tipo: ObjectKind::Table,
                },
                SchemaObject {
                    table_name: "order_totals".to_string(),
                    table_type: "VIEW".to_string(),
                    tipo: ObjectKind::View,
                },
            ]
        );

        let calls = browser.executor().calls();
        assert_eq!(calls[0].1, vec![QueryParam::String("public".to_string())]);
        assert!(!calls[0].0.contains("public"));
    }

    #[tokio::test]
    async fn list_objects_rejects_invalid_schema_without_querying() {
        let browser = Browser::new(RecordingExecutor::returning(vec![]));

        let error = browser.list_objects("bad name").await.unwrap_err();

        assert!(matches!(error, Error::InvalidIdentifier(_)));
        assert!(browser.executor().calls().is_empty());
    }

    #[tokio::test]
    async fn describe_columns_keeps_null_defaults() {
        let browser = Browser::new(RecordingExecutor::returning(vec![
            row(json!({
                "column_name": "id",
                "data_type": "integer",
                "is_nullable": "NO",
                "column_default": "nextval('orders_id_seq'::regclass)"
            })),
            row(json!({
                "column_name": "note",
                "data_type": "text",
                "is_nullable": "YES",
                "column_default": null
            })),
        ]));

        let columns = browser.describe_columns("public", "orders").await.unwrap();

        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1].column_default, None);
        assert_eq!(
            browser.executor().calls()[0].1,
            vec![QueryParam::from("public"), QueryParam::from("orders")]
        );
    }

    #[tokio::test]
    async fn pool_timeout_surfaces_as_its_own_kind() {
        let browser = Browser::new(RecordingExecutor::new(Outcome::TimesOut));

        let error = browser.list_schemas().await.unwrap_err();

        assert!(matches!(error, Error::PoolTimeout));
    }
}
