//! Identifier validation and the only place identifiers reach SQL text
//!
//! Drivers bind values, not identifiers, so schema and object names have to be
//! written into the statement itself. Every such name passes through
//! [`is_valid_identifier`] first, and the resulting [`QualifiedName`] is the only
//! input [`select_all_with_limit`] accepts.

use std::fmt;

use crate::Error;

/// Check a schema, table or view name against `^[A-Za-z_][A-Za-z0-9_]*$`
///
/// No length cap is applied here; the database enforces its own limit.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut characters = name.chars();

    match characters.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }

    characters.all(|character| character.is_ascii_alphanumeric() || character == '_')
}

/// Validate a single identifier, returning it back on success
pub fn validate(name: &str) -> Result<&str, Error> {
    if is_valid_identifier(name) {
        Ok(name)
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}

/// A `schema.object` pair whose parts both passed [`is_valid_identifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    schema: String,
    object: String,
}

impl QualifiedName {
    /// Validate both parts and pair them up
    ///
    /// The schema is checked first, so an invalid schema is the one reported
    /// when both parts are bad.
    pub fn new(schema: &str, object: &str) -> Result<Self, Error> {
        validate(schema)?;
        validate(object)?;

        Ok(Self {
            schema: schema.to_string(),
            object: object.to_string(),
        })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn object(&self) -> &str {
        &self.object
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}.{}", self.schema, self.object)
    }
}

/// Build `SELECT * FROM schema.object LIMIT $1`
///
/// The limit stays a placeholder; callers bind it as a parameter.
pub fn select_all_with_limit(target: &QualifiedName) -> String {
    format!("SELECT * FROM {} LIMIT $1", target)
}
