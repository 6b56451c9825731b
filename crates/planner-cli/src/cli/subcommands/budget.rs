use clap::Subcommand;

/// Budget category commands.
#[derive(Clone, Debug, Subcommand)]
pub enum BudgetCommands {
    /// Create a budget category.
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        /// Document type every expense in this category must carry. Repeatable.
        #[arg(long = "require-doc")]
        required_documents: Vec<String>,
        #[arg(long)]
        lab_head_approval: bool,
    },
    /// List budget categories.
    List,
    /// Get a budget category by code.
    Get { code: String },
}
