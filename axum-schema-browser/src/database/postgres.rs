//! PostgreSQL query executor implementation

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::database::traits::{DatabaseError, QueryExecutor, QueryParam, ResultSet, Row};
use async_trait::async_trait;
use serde_json::{Number, Value};
use sqlx::postgres::types::{Oid, PgInterval, PgMoney};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::types::{BigDecimal, Json, Uuid};
use sqlx::{Column, Decode, PgPool, Postgres, Row as _, Type, TypeInfo, ValueRef};
use tracing::{debug, warn};

/// PostgreSQL query executor backed by a shared connection pool
#[derive(Clone)]
pub struct PostgresExecutor {
    pool: PgPool,
}

impl PostgresExecutor {
    /// Create a new PostgreSQL executor
    ///
    /// # Arguments
    ///
    /// * `pool` - PostgreSQL connection pool, created once at startup
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, e.g. for closing it on shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Bind a parameter to a PostgreSQL query
    fn bind_param<'q>(
        query: Query<'q, Postgres, PgArguments>,
        param: &'q QueryParam,
    ) -> Query<'q, Postgres, PgArguments> {
        match param {
            QueryParam::Null => query.bind(None::<String>),
            QueryParam::Bool(value) => query.bind(*value),
            QueryParam::Int(value) => query.bind(*value),
            QueryParam::Float(value) => query.bind(*value),
            QueryParam::String(value) => query.bind(value.as_str()),
            QueryParam::Json(value) => query.bind(Json(value)),
        }
    }

    /// Convert a PostgreSQL row to an ordered JSON object
    fn row_to_json(row: &PgRow) -> Result<Row, DatabaseError> {
        let mut map = Row::new();

        for column in row.columns() {
            let type_name = column.type_info().name();
            let value = column_to_json(row, column.ordinal(), type_name, decoder_for(type_name))?;
            map.insert(column.name().to_string(), value);
        }

        Ok(map)
    }
}

/// How a column's value is turned into JSON, chosen from its type name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoder {
    Bool,
    Int2,
    Int4,
    Int8,
    Oid,
    Float4,
    Float8,
    Numeric,
    Money,
    Text,
    InternalChar,
    Bytea,
    Date,
    Time,
    Timestamp,
    Timestamptz,
    Interval,
    Uuid,
    Json,
    Inet,
    TextArray,
    Int4Array,
    Int8Array,
    BoolArray,
    Unsupported,
}

/// Pick the decoder for a sqlx type name
///
/// sqlx names `character(n)` `CHAR` and the internal one-byte type `"CHAR"`
/// (quotes included).
fn decoder_for(type_name: &str) -> Decoder {
    match type_name {
        "BOOL" => Decoder::Bool,
        "INT2" => Decoder::Int2,
        "INT4" => Decoder::Int4,
        "INT8" => Decoder::Int8,
        "OID" => Decoder::Oid,
        "FLOAT4" => Decoder::Float4,
        "FLOAT8" => Decoder::Float8,
        "NUMERIC" => Decoder::Numeric,
        "MONEY" => Decoder::Money,
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" | "UNKNOWN" | "CITEXT" | "citext" => {
            Decoder::Text
        }
        "\"CHAR\"" => Decoder::InternalChar,
        "BYTEA" => Decoder::Bytea,
        "DATE" => Decoder::Date,
        "TIME" => Decoder::Time,
        "TIMESTAMP" => Decoder::Timestamp,
        "TIMESTAMPTZ" => Decoder::Timestamptz,
        "INTERVAL" => Decoder::Interval,
        "UUID" => Decoder::Uuid,
        "JSON" | "JSONB" => Decoder::Json,
        "INET" | "CIDR" => Decoder::Inet,
        "TEXT[]" | "VARCHAR[]" | "CHAR[]" | "NAME[]" => Decoder::TextArray,
        "INT4[]" => Decoder::Int4Array,
        "INT8[]" => Decoder::Int8Array,
        "BOOL[]" => Decoder::BoolArray,
        _ => Decoder::Unsupported,
    }
}

fn column_to_json(
    row: &PgRow,
    index: usize,
    type_name: &str,
    decoder: Decoder,
) -> Result<Value, sqlx::Error> {
    let value = match decoder {
        Decoder::Bool => decode::<bool>(row, index)?.map(Value::Bool),
        Decoder::Int2 => decode::<i16>(row, index)?.map(Value::from),
        Decoder::Int4 => decode::<i32>(row, index)?.map(Value::from),
        Decoder::Int8 => decode::<i64>(row, index)?.map(Value::from),
        Decoder::Oid => decode::<Oid>(row, index)?.map(|oid| Value::from(oid.0)),
        Decoder::Float4 => decode::<f32>(row, index)?
            .and_then(|value| Number::from_f64(value as f64))
            .map(Value::Number),
        Decoder::Float8 => decode::<f64>(row, index)?
            .and_then(Number::from_f64)
            .map(Value::Number),
        // String keeps the exact precision
        Decoder::Numeric => match decode::<BigDecimal>(row, index) {
            Ok(value) => value.map(|value| Value::String(value.to_string())),
            // BigDecimal has no NaN or infinities
            Err(error) => match raw_bytes(row, index)?.and_then(numeric_special_value) {
                Some(special) => Some(Value::String(special.to_string())),
                None => return Err(error),
            },
        },
        Decoder::Money => decode::<PgMoney>(row, index)?
            .map(|money| Value::String(format_money(money.0))),
        Decoder::Text => decode::<String>(row, index)?.map(Value::String),
        Decoder::InternalChar => decode::<i8>(row, index)?
            .map(|value| Value::String(char::from(value as u8).to_string())),
        Decoder::Bytea => decode::<Vec<u8>>(row, index)?
            .map(|bytes| Value::String(format!("[BLOB: {} bytes]", bytes.len()))),
        Decoder::Date => decode::<NaiveDate>(row, index)?.map(|date| Value::String(date.to_string())),
        Decoder::Time => decode::<NaiveTime>(row, index)?.map(|time| Value::String(time.to_string())),
        Decoder::Timestamp => decode::<NaiveDateTime>(row, index)?
            .map(|timestamp| Value::String(timestamp.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())),
        Decoder::Timestamptz => decode::<DateTime<Utc>>(row, index)?
            .map(|timestamp| Value::String(format_timestamptz(&timestamp))),
        Decoder::Interval => decode::<PgInterval>(row, index)?
            .map(|interval| Value::String(format_interval(&interval))),
        Decoder::Uuid => decode::<Uuid>(row, index)?.map(|uuid| Value::String(uuid.to_string())),
        Decoder::Json => decode::<Value>(row, index)?,
        Decoder::Inet => match raw_bytes(row, index)? {
            Some(bytes) => Some(format_inet(bytes).map(Value::String).ok_or_else(|| {
                sqlx::Error::ColumnDecode {
                    index: index.to_string(),
                    source: format!("malformed {} value", type_name).into(),
                }
            })?),
            None => None,
        },
        Decoder::TextArray => decode::<Vec<String>>(row, index)?.map(Value::from),
        Decoder::Int4Array => decode::<Vec<i32>>(row, index)?.map(Value::from),
        Decoder::Int8Array => decode::<Vec<i64>>(row, index)?.map(Value::from),
        Decoder::BoolArray => decode::<Vec<bool>>(row, index)?.map(Value::from),
        Decoder::Unsupported => {
            if raw_bytes(row, index)?.is_none() {
                return Ok(Value::Null);
            }
            warn!(column = index, type_name, "no JSON mapping for column type");
            Some(Value::String(format!("<unsupported {}>", type_name)))
        }
    };

    Ok(value.unwrap_or(Value::Null))
}

fn decode<'r, T>(row: &'r PgRow, index: usize) -> Result<Option<T>, sqlx::Error>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get::<Option<T>, _>(index)
}

/// The undecoded wire bytes of a cell, `None` for NULL
fn raw_bytes(row: &PgRow, index: usize) -> Result<Option<&[u8]>, sqlx::Error> {
    let value = row.try_get_raw(index)?;
    if value.is_null() {
        return Ok(None);
    }

    value
        .as_bytes()
        .map(Some)
        .map_err(|source| sqlx::Error::ColumnDecode {
            index: index.to_string(),
            source,
        })
}

/// `NaN` and the infinities of a binary NUMERIC, read from its sign word
fn numeric_special_value(bytes: &[u8]) -> Option<&'static str> {
    let sign = u16::from_be_bytes([*bytes.get(4)?, *bytes.get(5)?]);
    match sign {
        0xC000 => Some("NaN"),
        0xD000 => Some("Infinity"),
        0xF000 => Some("-Infinity"),
        _ => None,
    }
}

fn format_timestamptz(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Render an interval the way PostgreSQL prints it, e.g. `1 year 2 mons 3 days 04:05:06`
fn format_interval(interval: &PgInterval) -> String {
    let years = interval.months / 12;
    let months = interval.months % 12;

    let mut parts = Vec::new();
    for (amount, unit) in [(years, "year"), (months, "mon"), (interval.days, "day")] {
        if amount != 0 {
            let plural = if amount == 1 { "" } else { "s" };
            parts.push(format!("{} {}{}", amount, unit, plural));
        }
    }

    if interval.microseconds != 0 || parts.is_empty() {
        let sign = if interval.microseconds < 0 { "-" } else { "" };
        let total = interval.microseconds.unsigned_abs();
        let seconds = total / 1_000_000;
        let fraction = total % 1_000_000;

        let mut time = format!(
            "{}{:02}:{:02}:{:02}",
            sign,
            seconds / 3600,
            seconds / 60 % 60,
            seconds % 60
        );
        if fraction != 0 {
            let digits = format!("{:06}", fraction);
            time.push('.');
            time.push_str(digits.trim_end_matches('0'));
        }
        parts.push(time);
    }

    parts.join(" ")
}

/// Money travels as a count of cents
fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, cents / 100, cents % 100)
}

/// Binary `inet`/`cidr`: family, prefix bits, cidr flag, address length, address
///
/// A host address with a full-length prefix prints without it, like PostgreSQL.
fn format_inet(bytes: &[u8]) -> Option<String> {
    let [family, bits, is_cidr, length, address @ ..] = bytes else {
        return None;
    };
    if address.len() != usize::from(*length) {
        return None;
    }

    let (ip, full_prefix) = match (*family, address.len()) {
        (2, 4) => (Ipv4Addr::new(address[0], address[1], address[2], address[3]).to_string(), 32),
        (3, 16) => {
            let octets: [u8; 16] = address.try_into().ok()?;
            (Ipv6Addr::from(octets).to_string(), 128)
        }
        _ => return None,
    };

    if *is_cidr == 0 && *bits == full_prefix {
        Some(ip)
    } else {
        Some(format!("{}/{}", ip, bits))
    }
}

#[async_trait]
impl QueryExecutor for PostgresExecutor {
    async fn execute(&self, sql: &str, params: &[QueryParam]) -> Result<ResultSet, DatabaseError> {
        debug!(sql, params = params.len(), "executing statement");

        let query = params.iter().fold(sqlx::query(sql), Self::bind_param);
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(Self::row_to_json).collect()
    }
}
