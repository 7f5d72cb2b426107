use budgetbook::{
    compute_balances, Account, BalanceMode, EntryKind, Transaction, TransactionStatus,
    CURRENCY_EPSILON,
};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn txn(
    d: NaiveDate,
    amount: f64,
    kind: EntryKind,
    account: Account,
    status: TransactionStatus,
) -> Transaction {
    Transaction::new(d, amount, kind, "General", account).with_status(status)
}

#[test]
fn actual_counts_completed_only_and_forecast_counts_everything() {
    let reference = date(2025, 3, 20);
    let transactions = vec![
        txn(
            date(2025, 3, 1),
            1000.0,
            EntryKind::Income,
            Account::Bank,
            TransactionStatus::Completed,
        ),
        txn(
            date(2025, 3, 5),
            300.0,
            EntryKind::Expense,
            Account::Bank,
            TransactionStatus::Completed,
        ),
        txn(
            date(2025, 3, 25),
            200.0,
            EntryKind::Expense,
            Account::Bank,
            TransactionStatus::Pending,
        ),
    ];

    let actual = compute_balances(&transactions, BalanceMode::Actual, reference);
    assert!((actual.bank_balance - 700.0).abs() < CURRENCY_EPSILON);

    let forecast = compute_balances(&transactions, BalanceMode::Forecast, reference);
    assert!((forecast.bank_balance - 500.0).abs() < CURRENCY_EPSILON);
}

#[test]
fn removing_a_pending_entry_never_changes_the_actual_result() {
    let reference = date(2025, 3, 20);
    let mut transactions = vec![
        txn(
            date(2025, 3, 1),
            1000.0,
            EntryKind::Income,
            Account::Bank,
            TransactionStatus::Completed,
        ),
        txn(
            date(2025, 3, 10),
            50.0,
            EntryKind::Expense,
            Account::Cash,
            TransactionStatus::Pending,
        ),
    ];

    let with_pending = compute_balances(&transactions, BalanceMode::Actual, reference);
    transactions.retain(|t| t.status == TransactionStatus::Completed);
    let without_pending = compute_balances(&transactions, BalanceMode::Actual, reference);

    assert_eq!(with_pending, without_pending);
}

#[test]
fn future_months_are_excluded_from_both_modes() {
    let reference = date(2025, 3, 20);
    let transactions = vec![
        txn(
            date(2025, 3, 1),
            100.0,
            EntryKind::Income,
            Account::Bank,
            TransactionStatus::Completed,
        ),
        txn(
            date(2025, 4, 1),
            999.0,
            EntryKind::Income,
            Account::Bank,
            TransactionStatus::Completed,
        ),
        txn(
            date(2025, 4, 2),
            999.0,
            EntryKind::Expense,
            Account::Bank,
            TransactionStatus::Pending,
        ),
    ];

    let actual = compute_balances(&transactions, BalanceMode::Actual, reference);
    assert!((actual.bank_balance - 100.0).abs() < CURRENCY_EPSILON);
    let forecast = compute_balances(&transactions, BalanceMode::Forecast, reference);
    assert!((forecast.bank_balance - 100.0).abs() < CURRENCY_EPSILON);
}

#[test]
fn accounts_partition_and_subtotals_cover_the_reference_month_only() {
    let reference = date(2025, 3, 20);
    let transactions = vec![
        // Prior month: moves the balance, stays out of the subtotals.
        txn(
            date(2025, 2, 15),
            400.0,
            EntryKind::Income,
            Account::Bank,
            TransactionStatus::Completed,
        ),
        txn(
            date(2025, 3, 3),
            120.0,
            EntryKind::Income,
            Account::Cash,
            TransactionStatus::Completed,
        ),
        txn(
            date(2025, 3, 8),
            80.0,
            EntryKind::Expense,
            Account::Cash,
            TransactionStatus::Completed,
        ),
    ];

    let actual = compute_balances(&transactions, BalanceMode::Actual, reference);
    assert!((actual.bank_balance - 400.0).abs() < CURRENCY_EPSILON);
    assert!((actual.cash_balance - 40.0).abs() < CURRENCY_EPSILON);
    assert!((actual.income - 120.0).abs() < CURRENCY_EPSILON);
    assert!((actual.expense - 80.0).abs() < CURRENCY_EPSILON);
}

#[test]
fn empty_input_yields_zeros() {
    let report = compute_balances(&[], BalanceMode::Forecast, date(2025, 3, 1));
    assert_eq!(report.bank_balance, 0.0);
    assert_eq!(report.cash_balance, 0.0);
    assert_eq!(report.income, 0.0);
    assert_eq!(report.expense, 0.0);
}

#[test]
fn zero_amount_is_counted_but_net_neutral() {
    let reference = date(2025, 3, 20);
    let transactions = vec![txn(
        date(2025, 3, 5),
        0.0,
        EntryKind::Expense,
        Account::Bank,
        TransactionStatus::Completed,
    )];
    let report = compute_balances(&transactions, BalanceMode::Actual, reference);
    assert_eq!(report.bank_balance, 0.0);
    assert_eq!(report.expense, 0.0);
}

#[test]
fn same_day_entries_sum_order_independently() {
    let reference = date(2025, 3, 20);
    let day = date(2025, 3, 10);
    let a = txn(
        day,
        0.1,
        EntryKind::Income,
        Account::Bank,
        TransactionStatus::Completed,
    );
    let b = txn(
        day,
        0.2,
        EntryKind::Income,
        Account::Bank,
        TransactionStatus::Completed,
    );
    let c = txn(
        day,
        0.3,
        EntryKind::Expense,
        Account::Bank,
        TransactionStatus::Completed,
    );

    let forward = compute_balances(
        &[a.clone(), b.clone(), c.clone()],
        BalanceMode::Actual,
        reference,
    );
    let backward = compute_balances(&[c, b, a], BalanceMode::Actual, reference);
    assert!((forward.bank_balance - backward.bank_balance).abs() < CURRENCY_EPSILON);
    assert!(forward.bank_balance.abs() < CURRENCY_EPSILON);
}
