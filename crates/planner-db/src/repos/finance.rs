//! Finance repository: accounts, transactions, balances and reports.
//!
//! Amounts are stored as positive cents with a debit/credit kind. Balances
//! are signed per account type (see [`planner_core::finance::signed_amount`]).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use planner_core::entities::{Account, Transaction};
use planner_core::enums::{AccountType, AuditAction, EntityType, TransactionKind};
use planner_core::finance::{
    BalanceTotals, HealthScore, PeriodTotals, health_score, signed_amount,
};
use planner_core::ids::{PREFIX_ACCOUNT, PREFIX_TRANSACTION};

use crate::error::DatabaseError;
use crate::helpers::{
    format_date, get_opt_string, parse_date, parse_datetime, parse_enum,
    parse_optional_datetime, require_existing, require_text, to_json,
};
use crate::repos::audit::AuditDraft;
use crate::service::PlannerService;

const ACCOUNT_COLS: &str = "id, name, account_type, currency, created_at, updated_at, deleted_at";
const TXN_COLS: &str =
    "id, account_id, kind, amount_cents, description, occurred_on, created_at, deleted_at";

const MIN_DATE: &str = "0000-01-01";
const MAX_DATE: &str = "9999-12-31";

/// Input for [`PlannerService::create_account`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub account_type: AccountType,
    pub currency: String,
}

/// Input for [`PlannerService::record_transaction`].
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: String,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub occurred_on: NaiveDate,
}

/// Signed balance of one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountBalance {
    pub account_id: String,
    pub name: String,
    pub account_type: AccountType,
    pub currency: String,
    pub balance_cents: i64,
}

/// Period report over the live accounts of one currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinanceReport {
    /// Currency every total is expressed in; `None` when there are no accounts.
    pub currency: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Balances as of `to`.
    pub accounts: Vec<AccountBalance>,
    /// Income and expense postings within the period.
    pub period: PeriodTotals,
    pub balances: BalanceTotals,
    pub net_cents: i64,
    pub health: HealthScore,
    pub generated_at: DateTime<Utc>,
}

fn row_to_account(row: &libsql::Row) -> Result<Account, DatabaseError> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        account_type: parse_enum(&row.get::<String>(2)?)?,
        currency: row.get(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
    })
}

fn row_to_transaction(row: &libsql::Row) -> Result<Transaction, DatabaseError> {
    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        amount_cents: row.get(3)?,
        description: get_opt_string(row, 4)?,
        occurred_on: parse_date(&row.get::<String>(5)?)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
    })
}

async fn fetch_account(conn: &libsql::Connection, id: &str) -> Result<Account, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {ACCOUNT_COLS} FROM finance_accounts WHERE id = ?1 AND deleted_at IS NULL"
            ),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_account(&row)
}

async fn fetch_transaction(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Transaction, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {TXN_COLS} FROM finance_transactions WHERE id = ?1 AND deleted_at IS NULL"
            ),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_transaction(&row)
}

fn overflow(what: &str) -> DatabaseError {
    DatabaseError::Query(format!("{what} overflows i64 cents"))
}

/// Add `cents` to a running total, failing instead of wrapping.
fn add_cents(total: &mut i64, cents: i64, what: &str) -> Result<(), DatabaseError> {
    *total = total.checked_add(cents).ok_or_else(|| overflow(what))?;
    Ok(())
}

/// Pick the currency a report is built in.
///
/// An explicit `requested` currency wins. Otherwise every live account must
/// share one currency.
fn report_currency(
    accounts: &[AccountBalance],
    requested: Option<&str>,
) -> Result<Option<String>, DatabaseError> {
    if let Some(code) = requested {
        require_text("currency", code)?;
        return Ok(Some(code.trim().to_ascii_uppercase()));
    }
    let mut seen: Vec<&str> = accounts.iter().map(|a| a.currency.as_str()).collect();
    seen.sort_unstable();
    seen.dedup();
    match seen.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some((*only).to_string())),
        many => Err(DatabaseError::validation(format!(
            "accounts use several currencies ({}); choose one for the report",
            many.join(", ")
        ))),
    }
}

fn date_bounds(from: Option<NaiveDate>, to: Option<NaiveDate>) -> (String, String) {
    (
        from.map_or_else(|| MIN_DATE.to_string(), format_date),
        to.map_or_else(|| MAX_DATE.to_string(), format_date),
    )
}

/// Per-account signed balances over postings dated within `[from, to]`.
async fn account_balances(
    conn: &libsql::Connection,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<AccountBalance>, DatabaseError> {
    let (from, to) = date_bounds(from, to);
    let mut rows = conn
        .query(
            "SELECT a.id, a.name, a.account_type, a.currency,
                    COALESCE(SUM(CASE WHEN t.kind = 'debit' THEN t.amount_cents END), 0),
                    COALESCE(SUM(CASE WHEN t.kind = 'credit' THEN t.amount_cents END), 0)
             FROM finance_accounts a
             LEFT JOIN finance_transactions t
               ON t.account_id = a.id AND t.deleted_at IS NULL
              AND t.occurred_on >= ?1 AND t.occurred_on <= ?2
             WHERE a.deleted_at IS NULL
             GROUP BY a.id, a.name, a.account_type, a.currency
             ORDER BY a.name, a.id",
            libsql::params![from, to],
        )
        .await?;

    let mut balances = Vec::new();
    while let Some(row) = rows.next().await? {
        let account_type: AccountType = parse_enum(&row.get::<String>(2)?)?;
        let account_id: String = row.get(0)?;
        let debits: i64 = row.get(4)?;
        let credits: i64 = row.get(5)?;
        let balance_cents = signed_amount(account_type, TransactionKind::Debit, debits)
            .checked_add(signed_amount(account_type, TransactionKind::Credit, credits))
            .ok_or_else(|| overflow(&format!("balance of {account_id}")))?;
        balances.push(AccountBalance {
            account_id,
            name: row.get(1)?,
            account_type,
            currency: row.get(3)?,
            balance_cents,
        });
    }
    Ok(balances)
}

impl PlannerService {
    pub async fn create_account(
        &self,
        actor: &str,
        new: NewAccount,
    ) -> Result<Account, DatabaseError> {
        require_text("name", &new.name)?;
        require_text("currency", &new.currency)?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ACCOUNT).await?;
        let account = Account {
            id: id.clone(),
            name: new.name.trim().to_string(),
            account_type: new.account_type,
            currency: new.currency.trim().to_ascii_uppercase(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let tx = self.begin().await?;
        tx.execute(
            &format!(
                "INSERT INTO finance_accounts ({ACCOUNT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)"
            ),
            libsql::params![
                id.as_str(),
                account.name.as_str(),
                account.account_type.as_str(),
                account.currency.as_str(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Account,
                entity_id: &id,
                action: AuditAction::Created,
                old_value: None,
                new_value: Some(to_json(&account)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(%id, kind = %account.account_type, "account created");
        Ok(account)
    }

    pub async fn get_account(&self, id: &str) -> Result<Account, DatabaseError> {
        fetch_account(self.db().conn(), id).await
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {ACCOUNT_COLS} FROM finance_accounts WHERE deleted_at IS NULL
                     ORDER BY name, id"
                ),
                (),
            )
            .await?;
        let mut accounts = Vec::new();
        while let Some(row) = rows.next().await? {
            accounts.push(row_to_account(&row)?);
        }
        Ok(accounts)
    }

    /// Post a transaction to an account.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive amount or unknown account.
    pub async fn record_transaction(
        &self,
        actor: &str,
        new: NewTransaction,
    ) -> Result<Transaction, DatabaseError> {
        if new.amount_cents <= 0 {
            return Err(DatabaseError::validation("amount must be greater than zero"));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_TRANSACTION).await?;
        let tx = self.begin().await?;
        require_existing(
            fetch_account(&tx, &new.account_id),
            format!("account {}", new.account_id),
        )
        .await?;

        let txn = Transaction {
            id: id.clone(),
            account_id: new.account_id,
            kind: new.kind,
            amount_cents: new.amount_cents,
            description: new.description,
            occurred_on: new.occurred_on,
            created_at: now,
            deleted_at: None,
        };
        tx.execute(
            &format!(
                "INSERT INTO finance_transactions ({TXN_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL)"
            ),
            libsql::params![
                id.as_str(),
                txn.account_id.as_str(),
                txn.kind.as_str(),
                txn.amount_cents,
                txn.description.as_deref(),
                format_date(txn.occurred_on),
                now.to_rfc3339()
            ],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Transaction,
                entity_id: &id,
                action: AuditAction::Created,
                old_value: None,
                new_value: Some(to_json(&txn)?),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(%id, account = %txn.account_id, amount = txn.amount_cents, "transaction recorded");
        Ok(txn)
    }

    /// Transactions for an account, oldest first, optionally bounded by date
    /// (both ends inclusive).
    pub async fn list_transactions(
        &self,
        account_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>, DatabaseError> {
        let (from, to) = date_bounds(from, to);
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {TXN_COLS} FROM finance_transactions
                     WHERE account_id = ?1 AND deleted_at IS NULL
                       AND occurred_on >= ?2 AND occurred_on <= ?3
                     ORDER BY occurred_on, created_at, id"
                ),
                libsql::params![account_id, from, to],
            )
            .await?;
        let mut txns = Vec::new();
        while let Some(row) = rows.next().await? {
            txns.push(row_to_transaction(&row)?);
        }
        Ok(txns)
    }

    /// Current signed balance of one account.
    pub async fn account_balance(&self, id: &str) -> Result<i64, DatabaseError> {
        let account = self.get_account(id).await?;
        let balances = account_balances(self.db().conn(), None, None).await?;
        Ok(balances
            .into_iter()
            .find(|b| b.account_id == account.id)
            .map_or(0, |b| b.balance_cents))
    }

    /// Build the period report in one currency.
    ///
    /// Income and expense totals count postings within `[from, to]`; asset
    /// and liability balances include everything up to `to`. Without an
    /// explicit `currency` the live accounts must all share one.
    ///
    /// # Errors
    ///
    /// Validation errors for an inverted range or mixed currencies;
    /// [`DatabaseError::Query`] when a total overflows.
    pub async fn finance_report(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        currency: Option<&str>,
    ) -> Result<FinanceReport, DatabaseError> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(DatabaseError::validation(format!(
                "report start {from} is after end {to}"
            )));
        }

        let conn = self.db().conn();
        let mut to_date = account_balances(conn, None, to).await?;
        let currency = report_currency(&to_date, currency)?;
        let in_currency = |b: &AccountBalance| currency.as_deref() == Some(b.currency.as_str());
        to_date.retain(in_currency);
        let in_period: Vec<AccountBalance> = account_balances(conn, from, to)
            .await?
            .into_iter()
            .filter(in_currency)
            .collect();

        let mut period = PeriodTotals::default();
        for b in &in_period {
            match b.account_type {
                AccountType::Income => {
                    add_cents(&mut period.income_cents, b.balance_cents, "income")?;
                }
                AccountType::Expense => {
                    add_cents(&mut period.expense_cents, b.balance_cents, "expense")?;
                }
                AccountType::Asset | AccountType::Liability => {}
            }
        }
        let mut balances = BalanceTotals::default();
        for b in &to_date {
            match b.account_type {
                AccountType::Asset => {
                    add_cents(&mut balances.assets_cents, b.balance_cents, "assets")?;
                }
                AccountType::Liability => {
                    add_cents(&mut balances.liabilities_cents, b.balance_cents, "liabilities")?;
                }
                AccountType::Income | AccountType::Expense => {}
            }
        }
        let net_cents = period.net_cents().ok_or_else(|| overflow("net"))?;

        let health = health_score(&period, &balances);
        tracing::debug!(currency = ?currency, overall = health.overall, "finance report built");
        Ok(FinanceReport {
            currency,
            from,
            to,
            accounts: to_date,
            period,
            balances,
            net_cents,
            health,
            generated_at: Utc::now(),
        })
    }

    pub async fn delete_transaction(&self, actor: &str, id: &str) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let tx = self.begin().await?;
        let current = fetch_transaction(&tx, id).await?;
        tx.execute(
            "UPDATE finance_transactions SET deleted_at = ?1 WHERE id = ?2",
            libsql::params![now.to_rfc3339(), id],
        )
        .await?;
        self.append_audit(
            &tx,
            AuditDraft {
                actor,
                entity_type: EntityType::Transaction,
                entity_id: id,
                action: AuditAction::Deleted,
                old_value: Some(to_json(&current)?),
                new_value: None,
            },
            now,
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }
}
