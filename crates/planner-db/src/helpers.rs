//! Row-to-entity parsing and SQL assembly helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic and handle the dual
//! datetime format issue (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a `YYYY-MM-DD` TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string is not a calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all planner-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Parse a JSON array TEXT column into typed items.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the column is not a JSON array of `T`.
pub fn parse_json_list<T: serde::de::DeserializeOwned>(s: &str) -> Result<Vec<T>, DatabaseError> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(s)
        .map_err(|e| DatabaseError::Query(format!("Invalid JSON list '{s}': {e}")))
}

/// Serialize a value for storage in a JSON TEXT column or an audit payload.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<Value, DatabaseError> {
    Ok(serde_json::to_value(value)?)
}

/// Pick the fields of `row` named by the keys of `changes`.
///
/// Builds both sides of the audit entry for a partial update: `changes` is
/// the serialized update (only the supplied fields), and `row` is the stored
/// row before the write for `old_value` or after it for `new_value`. Taking
/// `new_value` from the stored row records values as normalized on write.
#[must_use]
pub fn changed_fields(row: &Value, changes: &Value) -> Value {
    let mut out = Map::new();
    if let (Some(row), Some(changes)) = (row.as_object(), changes.as_object()) {
        for key in changes.keys() {
            out.insert(key.clone(), row.get(key).cloned().unwrap_or(Value::Null));
        }
    }
    Value::Object(out)
}

/// Accumulates `column = ?N` fragments for a dynamic `UPDATE`.
///
/// Only the fields an update actually supplies are pushed, so untouched
/// columns keep their stored values.
#[derive(Debug, Default)]
pub struct SetClause {
    sets: Vec<String>,
    params: Vec<libsql::Value>,
}

impl SetClause {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a NOT NULL column.
    pub fn set(&mut self, column: &str, value: impl Into<libsql::Value>) {
        self.params.push(value.into());
        self.sets.push(format!("{column} = ?{}", self.params.len()));
    }

    /// Set a nullable column; `None` writes SQL NULL.
    pub fn set_nullable(&mut self, column: &str, value: Option<&str>) {
        self.set(
            column,
            value.map_or(libsql::Value::Null, |v| libsql::Value::Text(v.to_string())),
        );
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Finish as `UPDATE {table} SET ... , updated_at = ? WHERE {key} = ?`.
    ///
    /// Soft-deleted rows are never matched.
    #[must_use]
    pub fn into_update(
        mut self,
        table: &str,
        key_column: &str,
        key: &str,
        now: DateTime<Utc>,
    ) -> (String, Vec<libsql::Value>) {
        self.set("updated_at", now.to_rfc3339());
        self.params.push(key.into());
        let sql = format!(
            "UPDATE {table} SET {} WHERE {key_column} = ?{} AND deleted_at IS NULL",
            self.sets.join(", "),
            self.params.len()
        );
        (sql, self.params)
    }
}

/// Render a date for a `YYYY-MM-DD` TEXT column.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Reject blank required text.
///
/// # Errors
///
/// Returns a validation error naming `field`.
pub fn require_text(field: &str, value: &str) -> Result<(), DatabaseError> {
    if value.trim().is_empty() {
        return Err(DatabaseError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Resolve a referenced row, turning a missing row into a validation error.
///
/// Used for foreign references (an owner, a category) where the caller's
/// input is at fault rather than the lookup.
///
/// # Errors
///
/// Returns a validation error naming `what` when `lookup` yields
/// `DatabaseError::NoResult`; other errors pass through.
pub async fn require_existing<T>(
    lookup: impl std::future::Future<Output = Result<T, DatabaseError>>,
    what: impl std::fmt::Display,
) -> Result<T, DatabaseError> {
    match lookup.await {
        Err(DatabaseError::NoResult) => {
            Err(DatabaseError::validation(format!("{what} does not exist")))
        }
        other => other,
    }
}
