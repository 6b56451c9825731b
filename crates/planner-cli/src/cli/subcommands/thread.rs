use clap::Subcommand;

/// Thread commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ThreadCommands {
    /// Open a thread on an initiative.
    Create {
        #[arg(long)]
        initiative: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: Option<String>,
        /// decision, build, research, block or question
        #[arg(long, default_value = "question")]
        shape: String,
        /// Author employee ID (defaults to the actor, which must then be an employee ID)
        #[arg(long)]
        author: Option<String>,
    },
    /// Update a thread. Pass an empty string to clear the body.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        shape: Option<String>,
    },
    /// Change state (proposed, active, resolved, archived).
    State {
        id: String,
        state: String,
        /// Required when resolving.
        #[arg(long)]
        resolution: Option<String>,
    },
    /// List threads on an initiative, or search all threads.
    List {
        #[arg(long)]
        initiative: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a thread by ID.
    Get { id: String },
    /// Soft-delete a thread.
    Delete { id: String },
}
