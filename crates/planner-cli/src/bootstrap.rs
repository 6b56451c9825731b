use planner_config::PlannerConfig;

/// Load `.env` and the layered configuration.
pub fn load_config() -> anyhow::Result<PlannerConfig> {
    PlannerConfig::load_with_dotenv().map_err(anyhow::Error::from)
}
