use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ExpenseStatus, WorkflowStep};

/// Master record for a budget category and its document checklist.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BudgetCategory {
    pub code: String,
    pub name: String,
    /// Document types that must be attached before submission.
    pub required_documents: Vec<String>,
    /// Always route requests in this category through the lab head.
    pub requires_lab_head_approval: bool,
    pub created_at: DateTime<Utc>,
}

/// A cost request moving through the approval workflow.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExpenseItem {
    pub id: String,
    pub category_code: String,
    pub requester_id: String,
    pub initiative_id: Option<String>,
    pub title: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: ExpenseStatus,
    /// Steps planned when the item was created, in order.
    pub workflow_steps: Vec<WorkflowStep>,
    pub current_step: Option<WorkflowStep>,
    pub step_entered_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A supporting document attached to an expense item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExpenseDocument {
    pub id: String,
    pub expense_id: String,
    pub doc_type: String,
    pub file_name: String,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
}
