use planner_db::updates::initiative::InitiativeUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::clearable;
use crate::context::AppContext;
use crate::output::output;

pub struct Fields<'a> {
    pub title: Option<&'a str>,
    pub owner: Option<&'a str>,
    pub description: Option<&'a str>,
    pub formation: Option<&'a str>,
    pub milestone: Option<&'a str>,
    pub product: Option<&'a str>,
}

pub async fn run(
    id: &str,
    fields: &Fields<'_>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut builder = InitiativeUpdateBuilder::new();
    if let Some(title) = fields.title {
        builder = builder.title(title);
    }
    if let Some(owner) = fields.owner {
        builder = builder.owner_id(owner);
    }
    if let Some(description) = fields.description {
        builder = builder.description(clearable(description));
    }
    if let Some(formation) = fields.formation {
        builder = builder.formation_id(clearable(formation));
    }
    if let Some(milestone) = fields.milestone {
        builder = builder.milestone(clearable(milestone));
    }
    if let Some(product) = fields.product {
        builder = builder.product(clearable(product));
    }

    let initiative = ctx
        .service
        .update_initiative(&ctx.actor, id, builder.build())
        .await?;
    output(&initiative, flags.format)
}
