//! Expense approval workflow settings.

use serde::{Deserialize, Serialize};

/// 10,000.00 in minor units.
const fn default_lab_head_threshold_cents() -> i64 {
    1_000_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowConfig {
    /// Requests at or above this amount also need lab head approval.
    #[serde(default = "default_lab_head_threshold_cents")]
    pub lab_head_threshold_cents: i64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            lab_head_threshold_cents: default_lab_head_threshold_cents(),
        }
    }
}
