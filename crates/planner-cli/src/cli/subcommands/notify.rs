use clap::Subcommand;

/// Notification commands.
#[derive(Clone, Debug, Subcommand)]
pub enum NotifyCommands {
    /// Send a notification.
    Send {
        #[arg(long)]
        to: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        entity_type: String,
        #[arg(long)]
        entity_id: String,
        #[arg(long, default_value = "status_changed")]
        kind: String,
        /// Skip the send when a notification with this key already exists.
        #[arg(long)]
        dedupe_key: Option<String>,
    },
    /// List notifications.
    List {
        #[arg(long)]
        recipient: Option<String>,
        #[arg(long)]
        unread: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Mark a notification read.
    Read { id: String },
}
