//! Background job intervals for `planner watch`.

use serde::{Deserialize, Serialize};

const fn default_sla_interval_secs() -> u64 {
    3600
}

const fn default_report_interval_secs() -> u64 {
    60
}

fn default_report_dir() -> String {
    ".planner/reports".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Seconds between SLA sweeps.
    #[serde(default = "default_sla_interval_secs")]
    pub sla_interval_secs: u64,

    /// Seconds between finance report snapshots.
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,

    /// Directory scheduled reports are written to.
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sla_interval_secs: default_sla_interval_secs(),
            report_interval_secs: default_report_interval_secs(),
            report_dir: default_report_dir(),
        }
    }
}
