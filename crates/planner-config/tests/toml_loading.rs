//! Integration tests for layered configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files, working directory and env vars.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use planner_config::{ConfigError, MAX_EXPENSE_STEP_HOURS, PlannerConfig};

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/var/lib/planner/planner.db"

[general]
default_limit = 50
default_actor = "ops-bot"

[workflow]
lab_head_threshold_cents = 250000

[sla]
expense_step_hours = 48
proposed_thread_days = 7

[scheduler]
sla_interval_secs = 900
report_interval_secs = 300
report_dir = "/tmp/planner-reports"
"#,
        )?;

        let config: PlannerConfig = Figment::from(Serialized::defaults(PlannerConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.path, "/var/lib/planner/planner.db");
        assert_eq!(config.general.default_limit, 50);
        assert_eq!(config.general.default_actor, "ops-bot");
        assert_eq!(config.workflow.lab_head_threshold_cents, 250_000);
        assert_eq!(config.sla.expense_step_hours, 48);
        assert_eq!(config.sla.proposed_thread_days, 7);
        assert_eq!(config.scheduler.sla_interval_secs, 900);
        assert_eq!(config.scheduler.report_interval_secs, 300);
        assert_eq!(config.scheduler.report_dir, "/tmp/planner-reports");
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[sla]\nexpense_step_hours = 24\n")?;

        let config: PlannerConfig = Figment::from(Serialized::defaults(PlannerConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        let defaults = PlannerConfig::default();
        assert_eq!(config.sla.expense_step_hours, 24);
        assert_eq!(config.sla.proposed_thread_days, defaults.sla.proposed_thread_days);
        assert_eq!(config.database.path, defaults.database.path);
        Ok(())
    });
}

#[test]
fn project_toml_is_picked_up_by_figment_at() {
    Jail::expect_with(|jail| {
        jail.create_dir(".planner")?;
        jail.create_file(
            ".planner/config.toml",
            "[scheduler]\nreport_dir = \"reports-from-project\"\n",
        )?;

        let config: PlannerConfig = PlannerConfig::figment_at(jail.directory()).extract()?;
        assert_eq!(config.scheduler.report_dir, "reports-from-project");
        Ok(())
    });
}

#[test]
fn env_var_overrides_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".planner")?;
        jail.create_file(
            ".planner/config.toml",
            "[general]\ndefault_limit = 10\ndefault_actor = \"from-toml\"\n",
        )?;
        jail.set_env("PLANNER_GENERAL__DEFAULT_LIMIT", "75");

        let config: PlannerConfig = PlannerConfig::figment_at(jail.directory()).extract()?;
        assert_eq!(config.general.default_limit, 75);
        assert_eq!(config.general.default_actor, "from-toml");
        Ok(())
    });
}

#[test]
fn load_rejects_zero_interval() {
    Jail::expect_with(|jail| {
        jail.set_env("PLANNER_SCHEDULER__SLA_INTERVAL_SECS", "0");

        let err = PlannerConfig::load().expect_err("zero interval should be rejected");
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "scheduler.sla_interval_secs"),
            "unexpected error: {err}"
        );
        Ok(())
    });
}

#[test]
fn load_rejects_sla_limit_beyond_ceiling() {
    Jail::expect_with(|jail| {
        jail.set_env("PLANNER_SLA__PROPOSED_THREAD_DAYS", "100000000");

        let err = PlannerConfig::load().expect_err("huge limit should be rejected");
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "sla.proposed_thread_days"),
            "unexpected error: {err}"
        );
        Ok(())
    });
}

#[test]
fn load_accepts_sla_limit_at_ceiling() {
    Jail::expect_with(|jail| {
        jail.set_env("PLANNER_SLA__EXPENSE_STEP_HOURS", MAX_EXPENSE_STEP_HOURS);

        let config = PlannerConfig::load().expect("ceiling is allowed");
        assert_eq!(config.sla.expense_step_hours, MAX_EXPENSE_STEP_HOURS);
        Ok(())
    });
}

#[test]
fn lab_head_threshold_bounds() {
    Jail::expect_with(|jail| {
        jail.set_env("PLANNER_WORKFLOW__LAB_HEAD_THRESHOLD_CENTS", i64::MAX);
        let config = PlannerConfig::load().expect("largest threshold is allowed");
        assert_eq!(config.workflow.lab_head_threshold_cents, i64::MAX);

        jail.set_env("PLANNER_WORKFLOW__LAB_HEAD_THRESHOLD_CENTS", "-1");
        let err = PlannerConfig::load().expect_err("negative threshold should be rejected");
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "workflow.lab_head_threshold_cents"),
            "unexpected error: {err}"
        );
        Ok(())
    });
}

#[test]
fn load_rejects_blank_database_path() {
    Jail::expect_with(|jail| {
        jail.set_env("PLANNER_DATABASE__PATH", "  ");

        let err = PlannerConfig::load().expect_err("blank path should be rejected");
        assert!(matches!(err, ConfigError::NotConfigured { ref section } if section == "database"));
        Ok(())
    });
}

#[test]
fn dotenv_values_flow_through_load() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "PLANNER_WORKFLOW__LAB_HEAD_THRESHOLD_CENTS=420000\n")?;

        let config = PlannerConfig::load_with_dotenv().expect("config loads");
        assert_eq!(config.workflow.lab_head_threshold_cents, 420_000);
        Ok(())
    });
}
