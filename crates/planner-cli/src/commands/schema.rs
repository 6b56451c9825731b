use anyhow::bail;
use planner_core::{audit_detail, entities, finance};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Type names accepted by `planner schema`.
pub const SCHEMA_NAMES: [&str; 17] = [
    "account",
    "balance_totals",
    "audit_entry",
    "budget_category",
    "employee",
    "expense_document",
    "expense_item",
    "formation",
    "formation_member",
    "health_score",
    "initiative",
    "member_detail",
    "notification",
    "status_changed_detail",
    "thread",
    "transaction",
    "workflow_detail",
];

macro_rules! schema_value {
    ($ty:ty) => {
        serde_json::to_value(schema_for!($ty))?
    };
}

/// Build the JSON schema for a named type, or `None` when the name is unknown.
pub fn schema_for_name(name: &str) -> anyhow::Result<Option<serde_json::Value>> {
    let schema = match name.replace('-', "_").as_str() {
        "account" => schema_value!(entities::Account),
        "balance_totals" => schema_value!(finance::BalanceTotals),
        "audit_entry" => schema_value!(entities::AuditEntry),
        "budget_category" => schema_value!(entities::BudgetCategory),
        "employee" => schema_value!(entities::Employee),
        "expense_document" => schema_value!(entities::ExpenseDocument),
        "expense_item" => schema_value!(entities::ExpenseItem),
        "formation" => schema_value!(entities::Formation),
        "formation_member" => schema_value!(entities::FormationMember),
        "health_score" => schema_value!(finance::HealthScore),
        "initiative" => schema_value!(entities::Initiative),
        "member_detail" => schema_value!(audit_detail::MemberDetail),
        "notification" => schema_value!(entities::Notification),
        "status_changed_detail" => schema_value!(audit_detail::StatusChangedDetail),
        "thread" => schema_value!(entities::Thread),
        "transaction" => schema_value!(entities::Transaction),
        "workflow_detail" => schema_value!(audit_detail::WorkflowDetail),
        _ => return Ok(None),
    };
    Ok(Some(schema))
}

/// Handle `planner schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    match schema_for_name(&args.type_name)? {
        Some(schema) => output(&schema, flags.format),
        None => bail!(
            "unknown schema type '{}' (expected one of: {})",
            args.type_name,
            SCHEMA_NAMES.join(", ")
        ),
    }
}
