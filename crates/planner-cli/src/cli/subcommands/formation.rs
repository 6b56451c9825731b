use clap::Subcommand;

/// Formation commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FormationCommands {
    /// Create a formation.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        purpose: Option<String>,
        #[arg(long, default_value = "weekly")]
        cadence: String,
        #[arg(long, default_value = "healthy")]
        energy: String,
    },
    /// Update a formation. Pass an empty string to clear the purpose.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        purpose: Option<String>,
        #[arg(long)]
        cadence: Option<String>,
        #[arg(long)]
        energy: Option<String>,
    },
    /// Add a member.
    AddMember {
        id: String,
        employee: String,
        #[arg(long, default_value = "contributor")]
        role: String,
    },
    /// Remove a member.
    RemoveMember { id: String, employee: String },
    /// List members.
    Members { id: String },
    /// List initiatives linked to a formation.
    Initiatives { id: String },
    /// List formations.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a formation by ID.
    Get { id: String },
    /// Soft-delete a formation.
    Delete { id: String },
}
