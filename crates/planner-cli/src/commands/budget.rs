use planner_db::repos::budget::NewBudgetCategory;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::BudgetCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `planner budget`.
pub async fn handle(
    action: &BudgetCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        BudgetCommands::Create {
            code,
            name,
            required_documents,
            lab_head_approval,
        } => {
            let category = ctx
                .service
                .create_budget_category(
                    &ctx.actor,
                    NewBudgetCategory {
                        code: code.clone(),
                        name: name.clone(),
                        required_documents: required_documents.clone(),
                        requires_lab_head_approval: *lab_head_approval,
                    },
                )
                .await?;
            output(&category, flags.format)
        }
        BudgetCommands::List => output(&ctx.service.list_budget_categories().await?, flags.format),
        BudgetCommands::Get { code } => {
            output(&ctx.service.get_budget_category(code).await?, flags.format)
        }
    }
}
