use chrono::Utc;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SlaArgs;
use crate::commands::shared::parse::parse_timestamp;
use crate::context::AppContext;
use crate::output::output;

/// Handle `planner sla`.
pub async fn handle(args: &SlaArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let now = match args.at.as_deref() {
        Some(raw) => parse_timestamp(raw, "at")?,
        None => Utc::now(),
    };
    let report = ctx.service.run_sla_sweep(now, &ctx.sla_policy()).await?;
    output(&report, flags.format)
}
