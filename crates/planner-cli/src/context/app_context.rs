use anyhow::Context;
use planner_config::PlannerConfig;
use planner_db::repos::sla::SlaPolicy;
use planner_db::service::PlannerService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: PlannerService,
    pub config: PlannerConfig,
    pub actor: String,
}

impl AppContext {
    /// Open the database named by `--db` or `database.path` and apply workflow settings.
    pub async fn init(config: PlannerConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let db_path = flags
            .db
            .clone()
            .unwrap_or_else(|| config.database.path.clone());

        let service = PlannerService::new_local(&db_path)
            .await
            .with_context(|| format!("failed to open planner database at {db_path}"))?
            .with_lab_head_threshold(config.workflow.lab_head_threshold_cents);

        let actor = resolve_actor(flags.actor.as_deref(), &config.general.default_actor);
        tracing::debug!(db = %db_path, %actor, "application context ready");

        Ok(Self {
            service,
            config,
            actor,
        })
    }

    /// SLA thresholds from the `sla` config section.
    #[must_use]
    pub fn sla_policy(&self) -> SlaPolicy {
        SlaPolicy {
            expense_step_hours: i64::from(self.config.sla.expense_step_hours),
            proposed_thread_days: i64::from(self.config.sla.proposed_thread_days),
        }
    }

    /// Fallback list size when neither the command nor `--limit` sets one.
    #[must_use]
    pub const fn default_limit(&self) -> u32 {
        self.config.general.default_limit
    }
}

fn resolve_actor(flag: Option<&str>, configured: &str) -> String {
    flag.map(str::trim)
        .filter(|actor| !actor.is_empty())
        .unwrap_or(configured)
        .to_string()
}
