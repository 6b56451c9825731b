use clap::Subcommand;

/// Expense commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ExpenseCommands {
    /// Create a draft expense.
    Create {
        #[arg(long)]
        category: String,
        #[arg(long)]
        title: String,
        /// Amount in minor units (cents).
        #[arg(long)]
        amount: i64,
        #[arg(long, default_value = "EUR")]
        currency: String,
        /// Requester employee ID (defaults to the actor)
        #[arg(long)]
        requester: Option<String>,
        #[arg(long)]
        initiative: Option<String>,
    },
    /// Update a draft or rejected expense. Pass an empty string to unlink the initiative.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        amount: Option<i64>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        initiative: Option<String>,
    },
    /// Attach a supporting document.
    Attach {
        id: String,
        #[arg(long = "type")]
        doc_type: String,
        #[arg(long)]
        file: String,
    },
    /// List attached documents.
    Documents { id: String },
    /// Submit for review.
    Submit { id: String },
    /// Approve the current workflow step.
    Approve {
        id: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Reject the expense.
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Move a rejected expense back to draft.
    Revise { id: String },
    /// List expenses.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        requester: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        initiative: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get an expense by ID.
    Get { id: String },
    /// Soft-delete a draft or rejected expense.
    Delete { id: String },
}
