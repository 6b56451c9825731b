use planner_core::enums::{EntityType, NotificationKind};
use planner_db::repos::notification::NewNotification;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::NotifyCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `planner notify`.
pub async fn handle(
    action: &NotifyCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        NotifyCommands::Send {
            to,
            message,
            entity_type,
            entity_id,
            kind,
            dedupe_key,
        } => {
            let sent = service
                .create_notification(
                    &ctx.actor,
                    NewNotification {
                        recipient_id: to.clone(),
                        kind: parse_enum::<NotificationKind>(kind, "kind")?,
                        entity_type: parse_enum::<EntityType>(entity_type, "entity-type")?,
                        entity_id: entity_id.clone(),
                        message: message.clone(),
                        dedupe_key: dedupe_key.clone(),
                    },
                )
                .await?;
            if sent.is_none() {
                tracing::info!(dedupe_key = ?dedupe_key, "notification already sent; skipped");
            }
            output(&sent, flags.format)
        }
        NotifyCommands::List {
            recipient,
            unread,
            limit,
        } => {
            let limit = effective_limit(*limit, flags.limit, ctx.default_limit());
            let notifications = service
                .list_notifications(recipient.as_deref(), *unread, limit)
                .await?;
            output(&notifications, flags.format)
        }
        NotifyCommands::Read { id } => {
            output(&service.mark_notification_read(&ctx.actor, id).await?, flags.format)
        }
    }
}
