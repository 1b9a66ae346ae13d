//! Request and response types for the browser endpoints
//!
//! Envelope field names (`erro`, `objetos`, `dados`, `colunas`, ...) are part of
//! the HTTP contract and stay as they are.

use serde::{Deserialize, Serialize};

use crate::database::traits::{QueryParam, ResultSet};

/// Whether a catalog entry is a table or a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Table,
    View,
}

impl ObjectKind {
    /// Classify an `information_schema.tables.table_type` value
    ///
    /// `VIEW` is a view; base tables, foreign tables and temporary tables are all
    /// treated as tables.
    pub fn from_table_type(table_type: &str) -> Self {
        if table_type == "VIEW" {
            ObjectKind::View
        } else {
            ObjectKind::Table
        }
    }
}

/// A table or view inside a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaObject {
    /// Object name
    pub table_name: String,

    /// Raw catalog type, e.g. "BASE TABLE" or "VIEW"
    pub table_type: String,

    /// Classified kind
    pub tipo: ObjectKind,
}

/// Metadata of one column of a table or view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub column_name: String,

    /// SQL data type as reported by the catalog (e.g. "integer", "text")
    pub data_type: String,

    /// "YES" or "NO"
    pub is_nullable: String,

    /// Default value expression (if any)
    pub column_default: Option<String>,
}

/// Query parameters for row retrieval and CSV export
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RowQuery {
    /// Maximum number of rows; each route applies its own default
    pub limit: Option<i64>,
}

/// Request body of the ad-hoc query endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    /// SQL text, must start with `select`
    #[serde(default)]
    pub sql: Option<String>,

    /// Values for `$1`, `$2`, ...; absent and `null` both mean none
    #[serde(default)]
    pub params: Option<Vec<QueryParam>>,
}

/// Response from listing schemas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemasResponse {
    pub success: bool,
    pub schemas: Vec<String>,
}

/// Response from listing the objects of a schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectsResponse {
    pub success: bool,
    pub schema: String,
    pub objetos: Vec<SchemaObject>,
}

/// Response containing the rows of a table or view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowsResponse {
    pub success: bool,
    pub schema: String,
    pub objeto: String,

    /// Number of rows returned
    pub total: usize,

    pub dados: ResultSet,
}

/// Response from an ad-hoc query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    pub total: usize,
    pub dados: ResultSet,
}

/// Response describing the columns of a table or view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsResponse {
    pub success: bool,
    pub schema: String,
    pub view: String,
    pub colunas: Vec<ColumnDescription>,
}

/// JSON error envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,

    /// Error message
    pub erro: String,

    /// Extra context, e.g. which object a failed row fetch targeted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalhes: Option<String>,
}
