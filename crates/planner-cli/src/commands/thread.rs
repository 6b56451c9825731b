use planner_core::enums::{ThreadShape, ThreadState};
use planner_db::repos::thread::NewThread;
use planner_db::updates::thread::ThreadUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ThreadCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{clearable, parse_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `planner thread`.
pub async fn handle(
    action: &ThreadCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        ThreadCommands::Create {
            initiative,
            title,
            body,
            shape,
            author,
        } => {
            let shape: ThreadShape = parse_enum(shape, "shape")?;
            let thread = service
                .create_thread(
                    &ctx.actor,
                    NewThread {
                        initiative_id: initiative.clone(),
                        title: title.clone(),
                        body: body.as_deref().and_then(clearable),
                        shape,
                        author_id: author.clone().unwrap_or_else(|| ctx.actor.clone()),
                    },
                )
                .await?;
            output(&thread, flags.format)
        }
        ThreadCommands::Update {
            id,
            title,
            body,
            shape,
        } => {
            let mut builder = ThreadUpdateBuilder::new();
            if let Some(title) = title {
                builder = builder.title(title);
            }
            if let Some(body) = body {
                builder = builder.body(clearable(body));
            }
            if let Some(shape) = shape {
                builder = builder.shape(parse_enum(shape, "shape")?);
            }
            let thread = service.update_thread(&ctx.actor, id, builder.build()).await?;
            output(&thread, flags.format)
        }
        ThreadCommands::State {
            id,
            state,
            resolution,
        } => {
            let state: ThreadState = parse_enum(state, "state")?;
            let thread = service
                .change_thread_state(&ctx.actor, id, state, resolution.as_deref())
                .await?;
            output(&thread, flags.format)
        }
        ThreadCommands::List {
            initiative,
            search,
            limit,
        } => {
            let threads = match (initiative, search) {
                (_, Some(query)) => {
                    let limit = effective_limit(*limit, flags.limit, ctx.default_limit());
                    service.search_threads(query, limit).await?
                }
                (Some(initiative), None) => service.list_threads_for_initiative(initiative).await?,
                (None, None) => anyhow::bail!("thread list needs --initiative or --search"),
            };
            output(&threads, flags.format)
        }
        ThreadCommands::Get { id } => output(&service.get_thread(id).await?, flags.format),
        ThreadCommands::Delete { id } => {
            service.delete_thread(&ctx.actor, id).await?;
            output(&serde_json::json!({ "id": id, "deleted": true }), flags.format)
        }
    }
}
