//! Untyped row mappings and the typed decode helpers built on them.

use std::collections::BTreeMap;
use std::fmt;

use rusqlite::types::Value;
use thiserror::Error;

/// Failure to turn a [`RawRow`] into an entity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The row has no column with this name
    #[error("missing column `{0}`")]
    MissingColumn(String),

    /// The column holds a value of the wrong storage class
    #[error("column `{column}` expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: String,
    },
}

/// A database row as an owned `column name -> value` mapping.
///
/// Also used as the column/value set for raw inserts and updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow(BTreeMap<String, Value>);

impl RawRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Capture every column of a result row
    pub fn from_sqlite(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let statement = row.as_ref();
        let mut columns = BTreeMap::new();
        for index in 0..statement.column_count() {
            let name = statement.column_name(index)?.to_string();
            columns.insert(name, row.get::<_, Value>(index)?);
        }
        Ok(Self(columns))
    }

    pub(crate) fn required(&self, column: &str) -> Result<&Value, DecodeError> {
        self.get(column)
            .ok_or_else(|| DecodeError::MissingColumn(column.to_string()))
    }

    pub(crate) fn integer(&self, column: &str) -> Result<i64, DecodeError> {
        match self.required(column)? {
            Value::Integer(value) => Ok(*value),
            other => Err(mismatch(column, "integer", other)),
        }
    }

    pub(crate) fn text(&self, column: &str) -> Result<String, DecodeError> {
        match self.required(column)? {
            Value::Text(value) => Ok(value.clone()),
            other => Err(mismatch(column, "text", other)),
        }
    }

    /// Text column that may hold NULL
    pub(crate) fn nullable_text(&self, column: &str) -> Result<Option<String>, DecodeError> {
        match self.required(column)? {
            Value::Null => Ok(None),
            Value::Text(value) => Ok(Some(value.clone())),
            other => Err(mismatch(column, "text", other)),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        )
    }
}

impl fmt::Display for RawRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self.columns().collect::<Vec<_>>().join(", ");
        write!(f, "row({columns})")
    }
}

fn mismatch(column: &str, expected: &'static str, found: &Value) -> DecodeError {
    DecodeError::TypeMismatch {
        column: column.to_string(),
        expected,
        found: found.data_type().to_string(),
    }
}
