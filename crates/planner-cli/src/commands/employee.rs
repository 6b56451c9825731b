use planner_core::enums::EmployeeStatus;
use planner_db::repos::employee::NewEmployee;
use planner_db::updates::employee::EmployeeUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EmployeeCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{clearable, parse_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `planner employee`.
pub async fn handle(
    action: &EmployeeCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        EmployeeCommands::Create {
            name,
            email,
            title,
            department,
        } => {
            let employee = service
                .create_employee(
                    &ctx.actor,
                    NewEmployee {
                        name: name.clone(),
                        email: email.clone(),
                        title: title.as_deref().and_then(clearable),
                        department: department.as_deref().and_then(clearable),
                    },
                )
                .await?;
            output(&employee, flags.format)
        }
        EmployeeCommands::Update {
            id,
            name,
            email,
            title,
            department,
        } => {
            let mut builder = EmployeeUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(email) = email {
                builder = builder.email(email);
            }
            if let Some(title) = title {
                builder = builder.title(clearable(title));
            }
            if let Some(department) = department {
                builder = builder.department(clearable(department));
            }
            let employee = service.update_employee(&ctx.actor, id, builder.build()).await?;
            output(&employee, flags.format)
        }
        EmployeeCommands::Status { id, status } => {
            let status: EmployeeStatus = parse_enum(status, "status")?;
            let employee = service.transition_employee(&ctx.actor, id, status).await?;
            output(&employee, flags.format)
        }
        EmployeeCommands::List { limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.default_limit());
            let employees = service.list_employees(limit).await?;
            output(&employees, flags.format)
        }
        EmployeeCommands::Get { id } => output(&service.get_employee(id).await?, flags.format),
        EmployeeCommands::Delete { id } => {
            service.delete_employee(&ctx.actor, id).await?;
            output(&serde_json::json!({ "id": id, "deleted": true }), flags.format)
        }
    }
}
