//! Cross-cutting error types for the planner.
//!
//! Domain-specific errors (e.g. `DatabaseError`, `ConfigError`) live in their
//! respective crates. All crate errors converge into `anyhow` in `planner-cli`.

use thiserror::Error;

/// Errors that can be raised by any planner crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Data failed validation (required fields, formats, business rules).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_message_names_both_states() {
        let err = CoreError::InvalidTransition {
            entity_type: "thread".into(),
            id: "thr-00000001".into(),
            from: "proposed".into(),
            to: "resolved".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid state transition: thread thr-00000001 from proposed to resolved"
        );
    }

    #[test]
    fn validation_shorthand() {
        let err = CoreError::validation("title is required");
        assert_eq!(err.to_string(), "Validation error: title is required");
    }
}
