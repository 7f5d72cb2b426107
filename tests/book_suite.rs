use budgetbook::{
    Account, BalanceMode, BudgetBook, BudgetError, EntryKind, JsonStore, MemoryStore, MonthRef,
    Policy, PotDefinition, PotOverride, RecurringRule, Transaction, TransactionStatus,
    CURRENCY_EPSILON,
};
use chrono::NaiveDate;
use tempfile::tempdir;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn memory_book(policy: Policy) -> BudgetBook {
    BudgetBook::new(Box::new(MemoryStore::new()), policy)
}

fn rent_rule() -> RecurringRule {
    RecurringRule::new(EntryKind::Expense, "Rent", 500.0, Account::Bank, 1)
}

#[test]
fn seed_then_materialize_then_rerun_is_idempotent() {
    let mut book = memory_book(Policy::default());
    let seeded = book.ensure_seed_rules(&[rent_rule()]).expect("seed");
    assert!(seeded);

    let first = book.run_materialization(date(2025, 3, 10)).expect("pass");
    assert_eq!(first.created.len(), 1);
    assert_eq!(book.transactions().unwrap().len(), 1);

    let second = book.run_materialization(date(2025, 3, 20)).expect("pass");
    assert!(second.created.is_empty());
    assert_eq!(second.duplicate_skips, 1);
    assert_eq!(book.transactions().unwrap().len(), 1);

    let reseeded = book.ensure_seed_rules(&[rent_rule()]).expect("seed");
    assert!(!reseeded, "a store with rules is left alone");
}

#[test]
fn status_toggle_moves_money_between_modes() {
    let mut book = memory_book(Policy::default());
    let txn = Transaction::new(
        date(2025, 3, 5),
        250.0,
        EntryKind::Income,
        "Salary",
        Account::Bank,
    );
    let id = txn.id;
    book.add_transaction(txn, None).unwrap();

    let reference = date(2025, 3, 20);
    let actual = book.balances(BalanceMode::Actual, reference).unwrap();
    assert!(actual.bank_balance.abs() < CURRENCY_EPSILON);
    let forecast = book.balances(BalanceMode::Forecast, reference).unwrap();
    assert!((forecast.bank_balance - 250.0).abs() < CURRENCY_EPSILON);

    book.set_transaction_status(id, TransactionStatus::Completed)
        .unwrap();
    let actual = book.balances(BalanceMode::Actual, reference).unwrap();
    assert!((actual.bank_balance - 250.0).abs() < CURRENCY_EPSILON);
}

#[test]
fn unknown_ids_surface_not_found() {
    let mut book = memory_book(Policy::default());
    let err = book
        .set_transaction_status(Uuid::new_v4(), TransactionStatus::Completed)
        .expect_err("unknown transaction");
    assert!(matches!(err, BudgetError::NotFound(_)));

    let err = book.delete_transaction(Uuid::new_v4()).expect_err("unknown");
    assert!(matches!(err, BudgetError::NotFound(_)));

    let err = book
        .set_rule_active(Uuid::new_v4(), false)
        .expect_err("unknown rule");
    assert!(matches!(err, BudgetError::NotFound(_)));
}

#[test]
fn deactivated_rule_stops_materializing() {
    let mut book = memory_book(Policy::default());
    let rule = rent_rule();
    let rule_id = rule.id;
    book.ensure_seed_rules(&[rule]).unwrap();
    book.set_rule_active(rule_id, false).unwrap();

    let report = book.run_materialization(date(2025, 3, 10)).unwrap();
    assert!(report.created.is_empty());
    assert_eq!(book.rules().unwrap().len(), 1, "soft delete keeps the rule");
}

#[test]
fn export_import_roundtrips_as_a_multiset() {
    let mut book = memory_book(Policy::default());
    for (day, amount) in [(1, 10.0), (5, 20.0), (9, 30.0)] {
        book.add_transaction(
            Transaction::new(
                date(2025, 3, day),
                amount,
                EntryKind::Expense,
                "General",
                Account::Cash,
            ),
            None,
        )
        .unwrap();
    }

    let exported = book.export().unwrap();
    let mut restored = memory_book(Policy::default());
    let count = restored.import(&exported).unwrap();
    assert_eq!(count, 3);

    let key = |t: &Transaction| (t.id, t.date, t.amount.to_bits());
    let mut before: Vec<_> = book.transactions().unwrap().iter().map(key).collect();
    let mut after: Vec<_> = restored.transactions().unwrap().iter().map(key).collect();
    before.sort();
    after.sort();
    assert_eq!(before, after);
}

#[test]
fn malformed_import_leaves_existing_data_untouched() {
    let mut book = memory_book(Policy::default());
    book.add_transaction(
        Transaction::new(
            date(2025, 3, 1),
            10.0,
            EntryKind::Expense,
            "General",
            Account::Bank,
        ),
        None,
    )
    .unwrap();

    let err = book
        .import(&serde_json::json!({"not": "a sequence"}))
        .expect_err("root must be a sequence");
    assert!(matches!(err, BudgetError::MalformedImport(_)));

    let err = book
        .import(&serde_json::json!([{"garbage": true}]))
        .expect_err("records must parse");
    assert!(matches!(err, BudgetError::MalformedImport(_)));

    assert_eq!(book.transactions().unwrap().len(), 1);
}

#[test]
fn pot_override_set_through_the_book_shapes_the_simulation() {
    let policy = Policy {
        pots: vec![PotDefinition::new(
            "Smoking",
            "Smoking",
            vec![1, 8, 15, 22],
            40.0,
        )],
        ..Policy::default()
    };
    let mut book = memory_book(policy);
    book.set_pot_override(PotOverride::for_month(
        "Smoking",
        MonthRef::new(2025, 6).unwrap(),
        80.0,
    ))
    .unwrap();

    let series = book
        .simulate(date(2025, 6, 1), date(2025, 6, 30), date(2025, 5, 31))
        .unwrap();
    assert!((series.last().unwrap().balance + 80.0).abs() < CURRENCY_EPSILON);

    // Upsert replaces, not accumulates.
    book.set_pot_override(PotOverride::for_month(
        "Smoking",
        MonthRef::new(2025, 6).unwrap(),
        20.0,
    ))
    .unwrap();
    assert_eq!(book.pot_overrides().unwrap().len(), 1);
}

#[test]
fn disk_backed_book_survives_a_reopen() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_path_buf();

    let rule_id;
    {
        let store = JsonStore::open(Some(root.clone())).unwrap();
        let mut book = BudgetBook::new(Box::new(store), Policy::default());
        let rule = rent_rule();
        rule_id = rule.id;
        let txn = Transaction::new(
            date(2025, 3, 1),
            500.0,
            EntryKind::Expense,
            "Rent",
            Account::Bank,
        );
        book.add_transaction(txn, Some(rule)).unwrap();
    }

    let store = JsonStore::open(Some(root)).unwrap();
    let book = BudgetBook::new(Box::new(store), Policy::default());
    assert_eq!(book.rules().unwrap()[0].id, rule_id);
    let listed = book.transactions().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].recurring_id, Some(rule_id));
}

#[test]
fn transactions_for_month_filters_by_calendar_month() {
    let mut book = memory_book(Policy::default());
    for (m, d) in [(2, 28), (3, 1), (3, 31), (4, 1)] {
        book.add_transaction(
            Transaction::new(
                date(2025, m, d),
                10.0,
                EntryKind::Expense,
                "General",
                Account::Bank,
            ),
            None,
        )
        .unwrap();
    }

    let march = book
        .transactions_for_month(MonthRef::new(2025, 3).unwrap())
        .unwrap();
    assert_eq!(march.len(), 2);
}
