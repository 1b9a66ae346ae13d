//! Database abstraction layer
//!
//! The browser core only ever talks to a [`QueryExecutor`]; the PostgreSQL
//! implementation lives behind the `postgres` feature.

pub mod traits;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use traits::{DatabaseError, QueryExecutor, QueryParam, ResultSet, Row};
