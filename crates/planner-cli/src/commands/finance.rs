use chrono::Utc;
use planner_core::enums::{AccountType, TransactionKind};
use planner_db::repos::finance::{NewAccount, NewTransaction};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::FinanceCommands;
use crate::commands::shared::parse::{clearable, parse_date, parse_enum, parse_optional_date};
use crate::context::AppContext;
use crate::output::output;

/// Handle `planner finance`.
pub async fn handle(
    action: &FinanceCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        FinanceCommands::CreateAccount {
            name,
            account_type,
            currency,
        } => {
            let account = service
                .create_account(
                    &ctx.actor,
                    NewAccount {
                        name: name.clone(),
                        account_type: parse_enum::<AccountType>(account_type, "type")?,
                        currency: currency.clone(),
                    },
                )
                .await?;
            output(&account, flags.format)
        }
        FinanceCommands::Accounts => output(&service.list_accounts().await?, flags.format),
        FinanceCommands::Balance { id } => {
            let account = service.get_account(id).await?;
            let balance_cents = service.account_balance(id).await?;
            output(
                &serde_json::json!({
                    "account_id": account.id,
                    "name": account.name,
                    "currency": account.currency,
                    "balance_cents": balance_cents,
                }),
                flags.format,
            )
        }
        FinanceCommands::Record {
            account,
            kind,
            amount,
            on,
            description,
        } => {
            let occurred_on = match on {
                Some(raw) => parse_date(raw, "on")?,
                None => Utc::now().date_naive(),
            };
            let transaction = service
                .record_transaction(
                    &ctx.actor,
                    NewTransaction {
                        account_id: account.clone(),
                        kind: parse_enum::<TransactionKind>(kind, "kind")?,
                        amount_cents: *amount,
                        description: description.as_deref().and_then(clearable),
                        occurred_on,
                    },
                )
                .await?;
            output(&transaction, flags.format)
        }
        FinanceCommands::Transactions { account, from, to } => {
            let from = parse_optional_date(from.as_deref(), "from")?;
            let to = parse_optional_date(to.as_deref(), "to")?;
            output(&service.list_transactions(account, from, to).await?, flags.format)
        }
        FinanceCommands::DeleteTransaction { id } => {
            service.delete_transaction(&ctx.actor, id).await?;
            output(&serde_json::json!({ "id": id, "deleted": true }), flags.format)
        }
        FinanceCommands::Report { from, to, currency } => {
            let from = parse_optional_date(from.as_deref(), "from")?;
            let to = parse_optional_date(to.as_deref(), "to")?;
            output(
                &service.finance_report(from, to, currency.as_deref()).await?,
                flags.format,
            )
        }
    }
}
