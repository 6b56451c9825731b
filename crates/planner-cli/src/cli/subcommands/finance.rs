use clap::Subcommand;

/// Finance commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FinanceCommands {
    /// Create an account.
    CreateAccount {
        #[arg(long)]
        name: String,
        /// asset, liability, income or expense
        #[arg(long = "type")]
        account_type: String,
        #[arg(long, default_value = "EUR")]
        currency: String,
    },
    /// List accounts.
    Accounts,
    /// Current balance of one account.
    Balance { id: String },
    /// Record a transaction.
    Record {
        account: String,
        /// debit or credit
        kind: String,
        /// Amount in minor units (cents).
        amount: i64,
        /// Booking date (YYYY-MM-DD, defaults to today).
        #[arg(long)]
        on: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// List transactions on an account.
    Transactions {
        account: String,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Soft-delete a transaction.
    DeleteTransaction { id: String },
    /// Balances, period totals and health score.
    Report {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Required when accounts use more than one currency.
        #[arg(long)]
        currency: Option<String>,
    },
}
