#[path = "expense/list.rs"]
mod list;
#[path = "expense/workflow.rs"]
mod workflow;

use planner_db::repos::expense::NewExpense;
use planner_db::updates::expense::ExpenseUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ExpenseCommands;
use crate::commands::shared::parse::clearable;
use crate::context::AppContext;
use crate::output::output;

/// Handle `planner expense`.
pub async fn handle(
    action: &ExpenseCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        ExpenseCommands::Create {
            category,
            title,
            amount,
            currency,
            requester,
            initiative,
        } => {
            let expense = service
                .create_expense(
                    &ctx.actor,
                    NewExpense {
                        category_code: category.clone(),
                        requester_id: requester.clone().unwrap_or_else(|| ctx.actor.clone()),
                        initiative_id: initiative.as_deref().and_then(clearable),
                        title: title.clone(),
                        amount_cents: *amount,
                        currency: currency.clone(),
                    },
                )
                .await?;
            output(&expense, flags.format)
        }
        ExpenseCommands::Update {
            id,
            title,
            amount,
            currency,
            initiative,
        } => {
            let mut builder = ExpenseUpdateBuilder::new();
            if let Some(title) = title {
                builder = builder.title(title);
            }
            if let Some(amount) = amount {
                builder = builder.amount_cents(*amount);
            }
            if let Some(currency) = currency {
                builder = builder.currency(currency);
            }
            if let Some(initiative) = initiative {
                builder = builder.initiative_id(clearable(initiative));
            }
            let expense = service.update_expense(&ctx.actor, id, builder.build()).await?;
            output(&expense, flags.format)
        }
        ExpenseCommands::Attach { id, doc_type, file } => {
            let document = service
                .attach_expense_document(&ctx.actor, id, doc_type, file)
                .await?;
            output(&document, flags.format)
        }
        ExpenseCommands::Documents { id } => {
            output(&service.list_expense_documents(id).await?, flags.format)
        }
        ExpenseCommands::Submit { id } => workflow::submit(id, ctx, flags).await,
        ExpenseCommands::Approve { id, note } => {
            workflow::approve(id, note.as_deref(), ctx, flags).await
        }
        ExpenseCommands::Reject { id, reason } => workflow::reject(id, reason, ctx, flags).await,
        ExpenseCommands::Revise { id } => workflow::revise(id, ctx, flags).await,
        ExpenseCommands::List {
            status,
            requester,
            category,
            initiative,
            limit,
        } => {
            let args = list::Args {
                status: status.as_deref(),
                requester: requester.as_deref(),
                category: category.as_deref(),
                initiative: initiative.as_deref(),
                limit: *limit,
            };
            list::run(&args, ctx, flags).await
        }
        ExpenseCommands::Get { id } => output(&service.get_expense(id).await?, flags.format),
        ExpenseCommands::Delete { id } => {
            service.delete_expense(&ctx.actor, id).await?;
            output(&serde_json::json!({ "id": id, "deleted": true }), flags.format)
        }
    }
}
