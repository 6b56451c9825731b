use planner_core::enums::ExpenseStatus;
use planner_db::repos::expense::ExpenseFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_optional_enum;
use crate::context::AppContext;
use crate::output::output;

pub struct Args<'a> {
    pub status: Option<&'a str>,
    pub requester: Option<&'a str>,
    pub category: Option<&'a str>,
    pub initiative: Option<&'a str>,
    pub limit: Option<u32>,
}

pub async fn run(args: &Args<'_>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = ExpenseFilter {
        status: parse_optional_enum::<ExpenseStatus>(args.status, "status")?,
        requester_id: args.requester.map(ToString::to_string),
        category_code: args.category.map(str::to_ascii_uppercase),
        initiative_id: args.initiative.map(ToString::to_string),
        limit: Some(effective_limit(args.limit, flags.limit, ctx.default_limit())),
    };
    let expenses = ctx.service.list_expenses(&filter).await?;
    output(&expenses, flags.format)
}
