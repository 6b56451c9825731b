#[path = "initiative/list.rs"]
mod list;
#[path = "initiative/update.rs"]
mod update;

use planner_core::enums::{EntityType, InitiativeStage, InitiativeStatus};
use planner_db::repos::initiative::NewInitiative;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::InitiativeCommands;
use crate::commands::shared::parse::{clearable, parse_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `planner initiative`.
pub async fn handle(
    action: &InitiativeCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        InitiativeCommands::Create {
            title,
            owner,
            description,
            formation,
            milestone,
            product,
        } => {
            let initiative = service
                .create_initiative(
                    &ctx.actor,
                    NewInitiative {
                        title: title.clone(),
                        description: description.as_deref().and_then(clearable),
                        owner_id: owner.clone(),
                        formation_id: formation.as_deref().and_then(clearable),
                        milestone: milestone.as_deref().and_then(clearable),
                        product: product.as_deref().and_then(clearable),
                    },
                )
                .await?;
            output(&initiative, flags.format)
        }
        InitiativeCommands::Update {
            id,
            title,
            owner,
            description,
            formation,
            milestone,
            product,
        } => {
            let fields = update::Fields {
                title: title.as_deref(),
                owner: owner.as_deref(),
                description: description.as_deref(),
                formation: formation.as_deref(),
                milestone: milestone.as_deref(),
                product: product.as_deref(),
            };
            update::run(id, &fields, ctx, flags).await
        }
        InitiativeCommands::Status { id, status, reason } => {
            let status: InitiativeStatus = parse_enum(status, "status")?;
            let initiative = service
                .change_initiative_status(&ctx.actor, id, status, reason.as_deref())
                .await?;
            output(&initiative, flags.format)
        }
        InitiativeCommands::Stage { id, stage } => {
            let stage: InitiativeStage = parse_enum(stage, "stage")?;
            let initiative = service
                .change_initiative_stage(&ctx.actor, id, stage)
                .await?;
            output(&initiative, flags.format)
        }
        InitiativeCommands::List {
            status,
            stage,
            owner,
            formation,
            search,
            limit,
        } => {
            let args = list::Args {
                status: status.as_deref(),
                stage: stage.as_deref(),
                owner: owner.as_deref(),
                formation: formation.as_deref(),
                search: search.as_deref(),
                limit: *limit,
            };
            list::run(&args, ctx, flags).await
        }
        InitiativeCommands::Get { id } => output(&service.get_initiative(id).await?, flags.format),
        InitiativeCommands::History { id } => {
            service.get_initiative(id).await?;
            let entries = service.audit_history(EntityType::Initiative, id).await?;
            output(&entries, flags.format)
        }
        InitiativeCommands::Delete { id } => {
            service.delete_initiative(&ctx.actor, id).await?;
            output(&serde_json::json!({ "id": id, "deleted": true }), flags.format)
        }
    }
}
