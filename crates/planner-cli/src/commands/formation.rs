use planner_core::enums::{Cadence, EnergyState, FormationRole};
use planner_db::repos::formation::NewFormation;
use planner_db::updates::formation::FormationUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::FormationCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{clearable, parse_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `planner formation`.
pub async fn handle(
    action: &FormationCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        FormationCommands::Create {
            name,
            purpose,
            cadence,
            energy,
        } => {
            let formation = service
                .create_formation(
                    &ctx.actor,
                    NewFormation {
                        name: name.clone(),
                        purpose: purpose.as_deref().and_then(clearable),
                        cadence: parse_enum::<Cadence>(cadence, "cadence")?,
                        energy_state: parse_enum::<EnergyState>(energy, "energy")?,
                    },
                )
                .await?;
            output(&formation, flags.format)
        }
        FormationCommands::Update {
            id,
            name,
            purpose,
            cadence,
            energy,
        } => {
            let mut builder = FormationUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(purpose) = purpose {
                builder = builder.purpose(clearable(purpose));
            }
            if let Some(cadence) = cadence {
                builder = builder.cadence(parse_enum(cadence, "cadence")?);
            }
            if let Some(energy) = energy {
                builder = builder.energy_state(parse_enum(energy, "energy")?);
            }
            let formation = service
                .update_formation(&ctx.actor, id, builder.build())
                .await?;
            output(&formation, flags.format)
        }
        FormationCommands::AddMember { id, employee, role } => {
            let role: FormationRole = parse_enum(role, "role")?;
            let member = service
                .add_formation_member(&ctx.actor, id, employee, role)
                .await?;
            output(&member, flags.format)
        }
        FormationCommands::RemoveMember { id, employee } => {
            service
                .remove_formation_member(&ctx.actor, id, employee)
                .await?;
            output(
                &serde_json::json!({ "formation_id": id, "employee_id": employee, "removed": true }),
                flags.format,
            )
        }
        FormationCommands::Members { id } => {
            output(&service.list_formation_members(id).await?, flags.format)
        }
        FormationCommands::Initiatives { id } => {
            output(&service.formation_initiatives(id).await?, flags.format)
        }
        FormationCommands::List { limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.default_limit());
            output(&service.list_formations(limit).await?, flags.format)
        }
        FormationCommands::Get { id } => output(&service.get_formation(id).await?, flags.format),
        FormationCommands::Delete { id } => {
            service.delete_formation(&ctx.actor, id).await?;
            output(&serde_json::json!({ "id": id, "deleted": true }), flags.format)
        }
    }
}
