use planner_core::enums::{AuditAction, EntityType};
use planner_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_optional_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `planner audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = effective_limit(None, flags.limit, 50);
    let filter = AuditFilter {
        entity_type: parse_optional_enum::<EntityType>(args.entity_type.as_deref(), "entity-type")?,
        entity_id: args.entity_id.clone(),
        actor: args.actor.clone(),
        action: parse_optional_enum::<AuditAction>(args.action.as_deref(), "action")?,
        limit: Some(limit),
    };

    let entries = ctx.service.query_audit(&filter).await?;
    output(&entries, flags.format)
}
