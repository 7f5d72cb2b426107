//! Balance aggregation over transaction instances.

use chrono::NaiveDate;

use crate::domain::{Account, EntryKind, MonthRef, Transaction};

/// Tolerance for floating currency aggregation, one cent.
pub const CURRENCY_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceMode {
    /// Only completed movements: what is actually there right now.
    Actual,
    /// Everything scheduled in the period, as if every pending obligation
    /// clears.
    Forecast,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BalanceReport {
    pub bank_balance: f64,
    pub cash_balance: f64,
    /// Income subtotal over the reference calendar month.
    pub income: f64,
    /// Expense subtotal over the reference calendar month.
    pub expense: f64,
}

impl BalanceReport {
    pub fn balance_for(&self, account: Account) -> f64 {
        match account {
            Account::Bank => self.bank_balance,
            Account::Cash => self.cash_balance,
        }
    }
}

/// Folds transactions into per-account totals plus current-month subtotals.
/// Transactions dated in months after the reference month are out-of-period
/// noise and contribute to neither mode.
pub fn compute_balances(
    transactions: &[Transaction],
    mode: BalanceMode,
    reference: NaiveDate,
) -> BalanceReport {
    let month = MonthRef::containing(reference);
    let mut report = BalanceReport::default();

    for txn in transactions {
        if MonthRef::containing(txn.date) > month {
            continue;
        }
        if mode == BalanceMode::Actual && !txn.is_completed() {
            continue;
        }
        let signed = txn.signed_amount();
        match txn.account {
            Account::Bank => report.bank_balance += signed,
            Account::Cash => report.cash_balance += signed,
        }
        if txn.in_month(month) {
            match txn.kind {
                EntryKind::Income => report.income += txn.amount,
                EntryKind::Expense => report.expense += txn.amount,
            }
        }
    }

    report
}
