use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `planner` binary.
#[derive(Debug, Parser)]
#[command(
    name = "planner",
    version,
    about = "Planner - initiatives, expenses, finance and team records"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Actor recorded in the audit log (defaults to general.default_actor)
    #[arg(short, long, global = true)]
    pub actor: Option<String>,

    /// Database path override (defaults to database.path)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            actor: self.actor.clone(),
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{ExpenseCommands, FinanceCommands, InitiativeCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "planner",
            "--format",
            "raw",
            "--limit",
            "10",
            "--verbose",
            "sla",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Sla(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["planner", "sla", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["planner", "--format", "xml", "sla"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from([
            "planner",
            "--actor",
            "emp-1",
            "--db",
            "/tmp/demo.db",
            "sla",
        ])
        .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.actor.as_deref(), Some("emp-1"));
        assert_eq!(flags.db.as_deref(), Some("/tmp/demo.db"));
    }

    #[test]
    fn initiative_status_takes_positional_target() {
        let cli = Cli::try_parse_from([
            "planner",
            "initiative",
            "status",
            "ini-1",
            "paused",
            "--reason",
            "waiting on vendor",
        ])
        .expect("cli should parse");

        let Commands::Initiative {
            action: InitiativeCommands::Status { id, status, reason },
        } = cli.command
        else {
            panic!("expected initiative status");
        };
        assert_eq!(id, "ini-1");
        assert_eq!(status, "paused");
        assert_eq!(reason.as_deref(), Some("waiting on vendor"));
    }

    #[test]
    fn expense_reject_requires_reason() {
        let parsed = Cli::try_parse_from(["planner", "expense", "reject", "exp-1"]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from([
            "planner",
            "expense",
            "reject",
            "exp-1",
            "--reason",
            "missing receipt",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Expense {
                action: ExpenseCommands::Reject { .. }
            }
        ));
    }

    #[test]
    fn finance_report_and_watch_accept_currency() {
        let cli = Cli::try_parse_from(["planner", "finance", "report", "--currency", "eur"])
            .expect("cli should parse");
        let Commands::Finance {
            action: FinanceCommands::Report { currency, .. },
        } = cli.command
        else {
            panic!("expected finance report");
        };
        assert_eq!(currency.as_deref(), Some("eur"));

        let cli = Cli::try_parse_from(["planner", "watch", "--currency", "usd", "--notify", "emp-1"])
            .expect("cli should parse");
        let Commands::Watch(args) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(args.currency.as_deref(), Some("usd"));
        assert_eq!(args.notify, vec!["emp-1".to_string()]);
    }
}
