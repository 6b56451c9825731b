//! # planner-config
//!
//! Layered configuration loading for the planner using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PLANNER_*` prefix, `__` as separator)
//! 2. Project-level `.planner/config.toml`
//! 3. User-level `~/.config/planner/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PLANNER_DATABASE__PATH` -> `database.path`,
//! `PLANNER_SLA__EXPENSE_STEP_HOURS` -> `sla.expense_step_hours`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use planner_config::PlannerConfig;
//!
//! let config = PlannerConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod database;
mod error;
mod general;
mod scheduler;
mod sla;
mod workflow;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use scheduler::SchedulerConfig;
pub use sla::{MAX_EXPENSE_STEP_HOURS, MAX_PROPOSED_THREAD_DAYS, SlaConfig};
pub use workflow::WorkflowConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub sla: SlaConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl PlannerConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain rooted at the current directory.
    pub fn figment() -> Figment {
        Self::figment_at(Path::new("."))
    }

    /// Build the figment provider chain for a specific project root.
    pub fn figment_at(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(".planner").join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("PLANNER_").split("__"))
    }

    /// Reject values the scheduler and workflow cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field, or
    /// `ConfigError::NotConfigured` when no database path is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.database.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "database".into(),
            });
        }
        let checks = [
            ("scheduler.sla_interval_secs", self.scheduler.sla_interval_secs == 0),
            (
                "scheduler.report_interval_secs",
                self.scheduler.report_interval_secs == 0,
            ),
            ("sla.expense_step_hours", self.sla.expense_step_hours == 0),
            ("sla.proposed_thread_days", self.sla.proposed_thread_days == 0),
            ("general.default_limit", self.general.default_limit == 0),
            (
                "workflow.lab_head_threshold_cents",
                self.workflow.lab_head_threshold_cents <= 0,
            ),
        ];
        if let Some((field, _)) = checks.iter().find(|(_, bad)| *bad) {
            return Err(ConfigError::InvalidValue {
                field: (*field).to_string(),
                reason: "must be greater than zero".into(),
            });
        }
        let ceilings = [
            (
                "sla.expense_step_hours",
                self.sla.expense_step_hours,
                MAX_EXPENSE_STEP_HOURS,
            ),
            (
                "sla.proposed_thread_days",
                self.sla.proposed_thread_days,
                MAX_PROPOSED_THREAD_DAYS,
            ),
        ];
        if let Some((field, _, max)) = ceilings.iter().find(|(_, value, max)| value > max) {
            return Err(ConfigError::InvalidValue {
                field: (*field).to_string(),
                reason: format!("must be at most {max}"),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("planner").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_valid() {
        let config = PlannerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.general.default_limit, 20);
        assert_eq!(config.sla.expense_step_hours, 72);
        assert_eq!(config.scheduler.sla_interval_secs, 3600);
        assert_eq!(config.workflow.lab_head_threshold_cents, 1_000_000);
    }

    #[test]
    fn figment_builds_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config: PlannerConfig = PlannerConfig::figment_at(dir.path())
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.database.path, ".planner/planner.db");
    }

    #[test]
    fn project_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".planner")).unwrap();
        std::fs::write(
            dir.path().join(".planner/config.toml"),
            "[sla]\nproposed_thread_days = 3\n\n[general]\ndefault_actor = \"emp-ops\"\n",
        )
        .unwrap();

        let config: PlannerConfig = PlannerConfig::figment_at(dir.path()).extract().unwrap();
        assert_eq!(config.sla.proposed_thread_days, 3);
        assert_eq!(config.sla.expense_step_hours, 72);
        assert_eq!(config.general.default_actor, "emp-ops");
    }

    #[test]
    fn env_overrides_nested_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PLANNER_SCHEDULER__REPORT_INTERVAL_SECS", "5");
            jail.set_env("PLANNER_DATABASE__PATH", ":memory:");
            let config: PlannerConfig = PlannerConfig::figment_at(jail.directory()).extract()?;
            assert_eq!(config.scheduler.report_interval_secs, 5);
            assert!(config.database.is_in_memory());
            Ok(())
        });
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = PlannerConfig::default();
        config.scheduler.sla_interval_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref field, .. } if field == "scheduler.sla_interval_secs"
        ));
    }

    #[test]
    fn sla_limits_accept_the_ceiling_and_reject_beyond() {
        let mut config = PlannerConfig::default();
        config.sla.expense_step_hours = MAX_EXPENSE_STEP_HOURS;
        config.sla.proposed_thread_days = MAX_PROPOSED_THREAD_DAYS;
        config.validate().unwrap();

        config.sla.proposed_thread_days = MAX_PROPOSED_THREAD_DAYS + 1;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref field, ref reason }
                if field == "sla.proposed_thread_days" && reason == "must be at most 3650"
        ));
    }

    #[test]
    fn blank_database_path_is_not_configured() {
        let mut config = PlannerConfig::default();
        config.database.path = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }
}
