use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    BudgetCommands, EmployeeCommands, ExpenseCommands, FinanceCommands, FormationCommands,
    InitiativeCommands, NotifyCommands, ThreadCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Employees.
    Employee {
        #[command(subcommand)]
        action: EmployeeCommands,
    },
    /// Initiatives.
    Initiative {
        #[command(subcommand)]
        action: InitiativeCommands,
    },
    /// Discussion threads on initiatives.
    Thread {
        #[command(subcommand)]
        action: ThreadCommands,
    },
    /// Formations (working groups).
    Formation {
        #[command(subcommand)]
        action: FormationCommands,
    },
    /// Budget categories.
    Budget {
        #[command(subcommand)]
        action: BudgetCommands,
    },
    /// Expense items and the approval workflow.
    Expense {
        #[command(subcommand)]
        action: ExpenseCommands,
    },
    /// Finance accounts, transactions and reports.
    Finance {
        #[command(subcommand)]
        action: FinanceCommands,
    },
    /// Notifications.
    Notify {
        #[command(subcommand)]
        action: NotifyCommands,
    },
    /// Query the audit log.
    Audit(AuditArgs),
    /// Dump JSON schema for an entity type.
    Schema(SchemaArgs),
    /// Run one SLA sweep.
    Sla(SlaArgs),
    /// Run the SLA sweep and finance report on an interval until Ctrl-C.
    Watch(WatchArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub entity_type: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    #[arg(long = "by")]
    pub actor: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    pub type_name: String,
}

#[derive(Clone, Debug, Args)]
pub struct SlaArgs {
    /// Evaluate deadlines as of this RFC 3339 timestamp instead of now.
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct WatchArgs {
    /// Override scheduler.sla_interval_secs.
    #[arg(long)]
    pub sla_interval: Option<u64>,
    /// Override scheduler.report_interval_secs.
    #[arg(long)]
    pub report_interval: Option<u64>,
    /// Override scheduler.report_dir.
    #[arg(long)]
    pub report_dir: Option<String>,
    /// Report currency, required when accounts use more than one.
    #[arg(long)]
    pub currency: Option<String>,
    /// Employee to notify when a report is written. Repeatable.
    #[arg(long)]
    pub notify: Vec<String>,
}
