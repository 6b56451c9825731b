//! Typed audit payloads.
//!
//! Transitions and workflow decisions record one of these shapes as the
//! audit `new_value` so readers do not have to diff whole rows.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detail for status, stage and state changes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

/// Detail for expense workflow decisions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WorkflowDetail {
    pub step: String,
    pub decision: String,
    pub note: Option<String>,
}

/// Detail for `AuditAction::MemberAdded` and `AuditAction::MemberRemoved`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MemberDetail {
    pub employee_id: String,
    pub role: String,
}
