//! Database error types for planner-db.

use planner_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// The operation is not allowed in the entity's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Domain rule violation (bad transition, failed validation).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// A transition that is not in the entity's transition table.
    pub fn invalid_transition(
        entity_type: impl ToString,
        id: &str,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        Self::Core(CoreError::InvalidTransition {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// A failed input or business-rule check.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Core(CoreError::validation(msg))
    }

    /// Whether this error was raised by a rejected state transition.
    #[must_use]
    pub const fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::Core(CoreError::InvalidTransition { .. }))
    }

    /// Whether this error was raised by a failed validation.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Core(CoreError::Validation(_)))
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(error: serde_json::Error) -> Self {
        Self::Other(error.into())
    }
}
