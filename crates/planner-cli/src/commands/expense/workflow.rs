use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn submit(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let expense = ctx.service.submit_expense(&ctx.actor, id).await?;
    tracing::info!(%id, step = ?expense.current_step, "expense submitted");
    output(&expense, flags.format)
}

pub async fn approve(
    id: &str,
    note: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let expense = ctx.service.approve_expense_step(&ctx.actor, id, note).await?;
    tracing::info!(%id, status = %expense.status, step = ?expense.current_step, "expense step approved");
    output(&expense, flags.format)
}

pub async fn reject(
    id: &str,
    reason: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let expense = ctx.service.reject_expense(&ctx.actor, id, reason).await?;
    tracing::info!(%id, "expense rejected");
    output(&expense, flags.format)
}

pub async fn revise(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let expense = ctx.service.revise_expense(&ctx.actor, id).await?;
    output(&expense, flags.format)
}
