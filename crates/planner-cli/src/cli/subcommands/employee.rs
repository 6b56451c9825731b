use clap::Subcommand;

/// Employee commands.
#[derive(Clone, Debug, Subcommand)]
pub enum EmployeeCommands {
    /// Create an employee.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },
    /// Update an employee. Pass an empty string to clear an optional field.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },
    /// Change employment status (active, on-leave, terminated).
    Status { id: String, status: String },
    /// List employees.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get an employee by ID.
    Get { id: String },
    /// Soft-delete an employee.
    Delete { id: String },
}
