//! Expense approval workflow planning.
//!
//! Every request is reviewed by its project manager and then by support.
//! Requests in categories that demand it, or at or above the configured
//! amount threshold, additionally wait on the lab head between the two.

use crate::enums::WorkflowStep;

/// Plan the ordered approval steps for a request.
#[must_use]
pub fn plan_steps(
    requires_lab_head_approval: bool,
    amount_cents: i64,
    lab_head_threshold_cents: i64,
) -> Vec<WorkflowStep> {
    let mut steps = vec![WorkflowStep::PmApproval];
    if requires_lab_head_approval || amount_cents >= lab_head_threshold_cents {
        steps.push(WorkflowStep::LabHeadApproval);
    }
    steps.push(WorkflowStep::SupportReview);
    steps
}

/// The step after `current`, or `None` when `current` is the last one.
#[must_use]
pub fn next_step(steps: &[WorkflowStep], current: WorkflowStep) -> Option<WorkflowStep> {
    let pos = steps.iter().position(|s| *s == current)?;
    steps.get(pos + 1).copied()
}

/// Required document types that have no matching attachment.
///
/// Comparison ignores ASCII case and surrounding whitespace. The result keeps
/// the checklist order and lists each missing type once.
#[must_use]
pub fn missing_documents(required: &[String], attached: &[String]) -> Vec<String> {
    let attached: Vec<String> = attached
        .iter()
        .map(|d| d.trim().to_ascii_lowercase())
        .collect();
    let mut missing: Vec<String> = Vec::new();
    for doc in required {
        let key = doc.trim().to_ascii_lowercase();
        if key.is_empty() || attached.contains(&key) {
            continue;
        }
        if !missing.iter().any(|m| m.trim().eq_ignore_ascii_case(&key)) {
            missing.push(doc.trim().to_string());
        }
    }
    missing
}
