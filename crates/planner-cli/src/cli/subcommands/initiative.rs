use clap::Subcommand;

/// Initiative commands.
#[derive(Clone, Debug, Subcommand)]
pub enum InitiativeCommands {
    /// Create an initiative.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        formation: Option<String>,
        #[arg(long)]
        milestone: Option<String>,
        #[arg(long)]
        product: Option<String>,
    },
    /// Update an initiative. Pass an empty string to clear an optional field.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        formation: Option<String>,
        #[arg(long)]
        milestone: Option<String>,
        #[arg(long)]
        product: Option<String>,
    },
    /// Change status (active, paused, shipped, abandoned).
    Status {
        id: String,
        status: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Move to another delivery stage.
    Stage { id: String, stage: String },
    /// List initiatives.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        stage: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        formation: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get an initiative by ID.
    Get { id: String },
    /// Show audit history for an initiative.
    History { id: String },
    /// Soft-delete an initiative and its threads.
    Delete { id: String },
}
