use planner_core::enums::{InitiativeStage, InitiativeStatus};
use planner_db::repos::initiative::InitiativeFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_optional_enum;
use crate::context::AppContext;
use crate::output::output;

pub struct Args<'a> {
    pub status: Option<&'a str>,
    pub stage: Option<&'a str>,
    pub owner: Option<&'a str>,
    pub formation: Option<&'a str>,
    pub search: Option<&'a str>,
    pub limit: Option<u32>,
}

pub async fn run(args: &Args<'_>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = effective_limit(args.limit, flags.limit, ctx.default_limit());

    if let Some(query) = args.search {
        let initiatives = ctx.service.search_initiatives(query, limit).await?;
        return output(&initiatives, flags.format);
    }

    let filter = InitiativeFilter {
        status: parse_optional_enum::<InitiativeStatus>(args.status, "status")?,
        stage: parse_optional_enum::<InitiativeStage>(args.stage, "stage")?,
        owner_id: args.owner.map(ToString::to_string),
        formation_id: args.formation.map(ToString::to_string),
        limit: Some(limit),
    };
    let initiatives = ctx.service.list_initiatives(&filter).await?;
    output(&initiatives, flags.format)
}
