//! Finance arithmetic: signed postings and the financial health score.
//!
//! Amounts are integer minor units (cents). The health score is a weighted
//! blend of three components, each clamped to `0.0..=100.0`:
//!
//! | component   | weight | full marks at                       |
//! |-------------|--------|-------------------------------------|
//! | liquidity   | 0.40   | assets at least twice liabilities   |
//! | savings     | 0.35   | 20% of income left after expenses   |
//! | debt        | 0.25   | no liabilities against assets       |

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AccountType, TransactionKind};

const LIQUIDITY_WEIGHT: f64 = 0.40;
const SAVINGS_WEIGHT: f64 = 0.35;
const DEBT_WEIGHT: f64 = 0.25;

const TARGET_LIQUIDITY_RATIO: f64 = 2.0;
const TARGET_SAVINGS_RATE: f64 = 0.20;

/// Effect of a posting on the balance of an account of `account_type`.
#[must_use]
pub const fn signed_amount(account_type: AccountType, kind: TransactionKind, amount_cents: i64) -> i64 {
    let debit = matches!(kind, TransactionKind::Debit);
    if debit == account_type.is_debit_normal() {
        amount_cents
    } else {
        -amount_cents
    }
}

/// Income and expense totals over a reporting period.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PeriodTotals {
    pub income_cents: i64,
    pub expense_cents: i64,
}

impl PeriodTotals {
    /// Income minus expense, or `None` when the difference leaves `i64`.
    #[must_use]
    pub const fn net_cents(&self) -> Option<i64> {
        self.income_cents.checked_sub(self.expense_cents)
    }
}

/// Balance-sheet totals at the end of a period.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BalanceTotals {
    pub assets_cents: i64,
    pub liabilities_cents: i64,
}

/// Weighted financial health score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HealthScore {
    pub liquidity: f64,
    pub savings_rate: f64,
    pub debt: f64,
    pub overall: f64,
}

#[allow(clippy::cast_precision_loss)]
fn ratio(num: i64, den: i64) -> f64 {
    num as f64 / den as f64
}

fn clamp_score(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// Compute the health score for a period.
#[must_use]
pub fn health_score(period: &PeriodTotals, balances: &BalanceTotals) -> HealthScore {
    let liquidity = if balances.liabilities_cents <= 0 {
        if balances.assets_cents > 0 { 100.0 } else { 0.0 }
    } else {
        clamp_score(
            ratio(balances.assets_cents, balances.liabilities_cents) / TARGET_LIQUIDITY_RATIO
                * 100.0,
        )
    };

    let savings_rate = if period.income_cents <= 0 {
        0.0
    } else {
        let net = period.income_cents.saturating_sub(period.expense_cents);
        clamp_score(ratio(net, period.income_cents) / TARGET_SAVINGS_RATE * 100.0)
    };

    let debt = if balances.assets_cents <= 0 {
        0.0
    } else {
        clamp_score((1.0 - ratio(balances.liabilities_cents, balances.assets_cents)) * 100.0)
    };

    let overall = debt.mul_add(
        DEBT_WEIGHT,
        liquidity.mul_add(LIQUIDITY_WEIGHT, savings_rate * SAVINGS_WEIGHT),
    );

    HealthScore {
        liquidity,
        savings_rate,
        debt,
        overall: (overall * 100.0).round() / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AccountType::Asset, TransactionKind::Debit, 100)]
    #[case(AccountType::Asset, TransactionKind::Credit, -100)]
    #[case(AccountType::Expense, TransactionKind::Debit, 100)]
    #[case(AccountType::Income, TransactionKind::Credit, 100)]
    #[case(AccountType::Income, TransactionKind::Debit, -100)]
    #[case(AccountType::Liability, TransactionKind::Credit, 100)]
    fn signs_postings(
        #[case] account_type: AccountType,
        #[case] kind: TransactionKind,
        #[case] expected: i64,
    ) {
        assert_eq!(signed_amount(account_type, kind, 100), expected);
    }

    #[test]
    fn perfect_health() {
        let score = health_score(
            &PeriodTotals { income_cents: 10_000, expense_cents: 5_000 },
            &BalanceTotals { assets_cents: 50_000, liabilities_cents: 0 },
        );
        assert!((score.liquidity - 100.0).abs() < f64::EPSILON);
        assert!((score.savings_rate - 100.0).abs() < f64::EPSILON);
        assert!((score.debt - 100.0).abs() < f64::EPSILON);
        assert!((score.overall - 100.0).abs() < 1e-9);
    }

    #[test]
    fn partial_health() {
        // liquidity: 1.0 / 2.0 -> 50, savings: 0.1 / 0.2 -> 50, debt: 1 - 1 -> 0
        let score = health_score(
            &PeriodTotals { income_cents: 10_000, expense_cents: 9_000 },
            &BalanceTotals { assets_cents: 20_000, liabilities_cents: 20_000 },
        );
        assert!((score.liquidity - 50.0).abs() < 1e-9);
        assert!((score.savings_rate - 50.0).abs() < 1e-9);
        assert!(score.debt.abs() < 1e-9);
        assert!((score.overall - 37.5).abs() < 1e-9);
    }

    #[test]
    fn empty_books_score_zero_without_nan() {
        let score = health_score(&PeriodTotals::default(), &BalanceTotals::default());
        assert!(score.overall.abs() < f64::EPSILON);
        assert!(!score.overall.is_nan());
    }

    #[test]
    fn overspending_clamps_to_zero() {
        let score = health_score(
            &PeriodTotals { income_cents: 1_000, expense_cents: 5_000 },
            &BalanceTotals { assets_cents: 1_000, liabilities_cents: 4_000 },
        );
        assert!(score.savings_rate.abs() < f64::EPSILON);
        assert!(score.debt.abs() < f64::EPSILON);
        assert!((score.liquidity - 12.5).abs() < 1e-9);
    }

    #[test]
    fn net_is_none_when_it_leaves_range() {
        let period = PeriodTotals { income_cents: i64::MIN + 1, expense_cents: 2 };
        assert_eq!(period.net_cents(), None);
        assert_eq!(
            PeriodTotals { income_cents: 10, expense_cents: 4 }.net_cents(),
            Some(6)
        );
    }

    #[test]
    fn extreme_totals_stay_in_range() {
        let score = health_score(
            &PeriodTotals { income_cents: i64::MAX, expense_cents: i64::MIN + 1 },
            &BalanceTotals { assets_cents: i64::MAX, liabilities_cents: 1 },
        );
        assert!((score.liquidity - 100.0).abs() < f64::EPSILON);
        assert!((score.savings_rate - 100.0).abs() < f64::EPSILON);
        assert!(score.overall.is_finite());
    }
}
