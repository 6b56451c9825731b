//! SLA thresholds for the periodic sweep.

use serde::{Deserialize, Serialize};

/// Longest accepted step limit: ten years.
pub const MAX_EXPENSE_STEP_HOURS: u32 = 24 * 365 * 10;

/// Longest accepted proposed-thread limit: ten years.
pub const MAX_PROPOSED_THREAD_DAYS: u32 = 365 * 10;

const fn default_expense_step_hours() -> u32 {
    72
}

const fn default_proposed_thread_days() -> u32 {
    14
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SlaConfig {
    /// Hours an expense item may wait on one approval step.
    #[serde(default = "default_expense_step_hours")]
    pub expense_step_hours: u32,

    /// Days a thread may stay `proposed` before its initiative owner is nudged.
    #[serde(default = "default_proposed_thread_days")]
    pub proposed_thread_days: u32,
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self {
            expense_step_hours: default_expense_step_hours(),
            proposed_thread_days: default_proposed_thread_days(),
        }
    }
}
