//! `BudgetBook`: facade coordinating the store, the policy tables, and the
//! engine passes. The presentation layer calls these plain-data entry points
//! and redraws from the results.

use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

use crate::config::Policy;
use crate::core::balance::{compute_balances, BalanceMode, BalanceReport, CURRENCY_EPSILON};
use crate::core::forecast::{simulate, DailyBalance};
use crate::core::materializer::{materialize, MaterializeFailure, MaterializeReport};
use crate::domain::{
    Account, EntryKind, MonthRef, PotOverride, RecurringRule, Transaction, TransactionStatus,
};
use crate::errors::BudgetError;
use crate::storage::Store;

const CORRECTION_CATEGORY: &str = "Adjustment";

pub struct BudgetBook {
    store: Box<dyn Store>,
    policy: Policy,
}

impl BudgetBook {
    pub fn new(store: Box<dyn Store>, policy: Policy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: Policy) {
        self.policy = policy;
    }

    /// Records a transaction, optionally pairing it with the rule that will
    /// keep materializing the same obligation in later months. On a paired
    /// insert the rule is written first and unwound if the transaction fails,
    /// so a partial failure leaves no dangling reference.
    pub fn add_transaction(
        &mut self,
        mut txn: Transaction,
        rule: Option<RecurringRule>,
    ) -> Result<Transaction, BudgetError> {
        validate_transaction(&txn)?;
        if let Some(rule) = rule {
            validate_rule(&rule)?;
            let rule_id = rule.id;
            txn.is_recurring = true;
            txn.recurring_id = Some(rule_id);
            self.store.add_rule(rule)?;
            if let Err(err) = self.store.add_transaction(txn.clone()) {
                let _ = self.store.delete_rule(rule_id);
                return Err(err);
            }
        } else {
            self.store.add_transaction(txn.clone())?;
        }
        tracing::info!(id = %txn.id, date = %txn.date, "recorded transaction");
        Ok(txn)
    }

    pub fn update_transaction(&mut self, txn: Transaction) -> Result<(), BudgetError> {
        validate_transaction(&txn)?;
        if self.store.transaction(txn.id)?.is_none() {
            return Err(BudgetError::NotFound(txn.id));
        }
        self.store.put_transaction(txn)
    }

    pub fn set_transaction_status(
        &mut self,
        id: Uuid,
        status: TransactionStatus,
    ) -> Result<(), BudgetError> {
        let mut txn = self
            .store
            .transaction(id)?
            .ok_or(BudgetError::NotFound(id))?;
        txn.status = status;
        self.store.put_transaction(txn)
    }

    pub fn delete_transaction(&mut self, id: Uuid) -> Result<(), BudgetError> {
        self.store.delete_transaction(id)
    }

    pub fn update_rule(&mut self, rule: RecurringRule) -> Result<(), BudgetError> {
        validate_rule(&rule)?;
        if self.store.rule(rule.id)?.is_none() {
            return Err(BudgetError::NotFound(rule.id));
        }
        self.store.put_rule(rule)
    }

    /// Rules are never hard-deleted by the engine; deactivation stops
    /// materialization while keeping history resolvable.
    pub fn set_rule_active(&mut self, id: Uuid, active: bool) -> Result<(), BudgetError> {
        let mut rule = self.store.rule(id)?.ok_or(BudgetError::NotFound(id))?;
        rule.active = active;
        self.store.put_rule(rule)
    }

    pub fn rules(&self) -> Result<Vec<RecurringRule>, BudgetError> {
        self.store.rules()
    }

    pub fn transactions(&self) -> Result<Vec<Transaction>, BudgetError> {
        self.store.transactions()
    }

    pub fn transactions_for_month(&self, month: MonthRef) -> Result<Vec<Transaction>, BudgetError> {
        Ok(self
            .store
            .transactions()?
            .into_iter()
            .filter(|txn| txn.in_month(month))
            .collect())
    }

    /// Installs the starter rule set on a fresh store. Returns whether
    /// seeding happened; a store that already has rules is left alone.
    pub fn ensure_seed_rules(&mut self, seeds: &[RecurringRule]) -> Result<bool, BudgetError> {
        if !self.store.rules()?.is_empty() {
            return Ok(false);
        }
        for rule in seeds {
            validate_rule(rule)?;
            self.store.add_rule(rule.clone())?;
        }
        tracing::info!(count = seeds.len(), "seeded recurring rules");
        Ok(!seeds.is_empty())
    }

    /// Session-start pass: materializes the month containing `reference` and
    /// applies the instances rule-by-rule. A failure persisting one instance
    /// is collected and does not block the others; inserting an instance that
    /// appeared concurrently is a no-op skip.
    pub fn run_materialization(
        &mut self,
        reference: NaiveDate,
    ) -> Result<MaterializeReport, BudgetError> {
        let rules = self.store.rules()?;
        let existing = self.store.transactions()?;
        let mut report = materialize(&rules, &existing, reference, &self.policy);

        let built = std::mem::take(&mut report.created);
        for txn in built {
            match self.store.add_transaction(txn.clone()) {
                Ok(()) => report.created.push(txn),
                Err(BudgetError::DuplicateId(_)) => report.duplicate_skips += 1,
                Err(error) => {
                    let rule_id = txn.recurring_id.unwrap_or(txn.id);
                    tracing::warn!(rule = %rule_id, %error, "failed to persist materialized instance");
                    report.failures.push(MaterializeFailure { rule_id, error });
                }
            }
        }

        tracing::info!(
            created = report.created.len(),
            duplicates = report.duplicate_skips,
            skipped = report.policy_skips,
            failures = report.failures.len(),
            "materialization pass finished"
        );
        Ok(report)
    }

    pub fn balances(
        &self,
        mode: BalanceMode,
        reference: NaiveDate,
    ) -> Result<BalanceReport, BudgetError> {
        Ok(compute_balances(
            &self.store.transactions()?,
            mode,
            reference,
        ))
    }

    pub fn simulate(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        today: NaiveDate,
    ) -> Result<Vec<DailyBalance>, BudgetError> {
        Ok(simulate(
            &self.store.transactions()?,
            &self.store.rules()?,
            &self.policy,
            &self.store.pot_overrides()?,
            from,
            to,
            today,
        ))
    }

    pub fn pot_overrides(&self) -> Result<Vec<PotOverride>, BudgetError> {
        self.store.pot_overrides()
    }

    /// Upserts one override, keyed by (category, month scope).
    pub fn set_pot_override(&mut self, entry: PotOverride) -> Result<(), BudgetError> {
        let mut overrides = self.store.pot_overrides()?;
        overrides.retain(|o| !(o.category == entry.category && o.month == entry.month));
        overrides.push(entry);
        self.store.save_pot_overrides(overrides)
    }

    /// Current state as a flat JSON sequence of transaction records.
    pub fn export(&self) -> Result<Value, BudgetError> {
        let mut records = Vec::new();
        for txn in self.store.transactions()? {
            records.push(serde_json::to_value(&txn)?);
        }
        Ok(Value::Array(records))
    }

    /// Replaces the transaction collection with an exported sequence. The
    /// whole batch is parsed and validated before anything is applied, so a
    /// malformed import leaves existing data untouched.
    pub fn import(&mut self, value: &Value) -> Result<usize, BudgetError> {
        let items = value.as_array().ok_or_else(|| {
            BudgetError::MalformedImport("top-level value is not a sequence".into())
        })?;
        let mut incoming = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let txn: Transaction = serde_json::from_value(item.clone()).map_err(|err| {
                BudgetError::MalformedImport(format!("record {}: {}", index, err))
            })?;
            validate_transaction(&txn)
                .map_err(|err| BudgetError::MalformedImport(format!("record {}: {}", index, err)))?;
            incoming.push(txn);
        }
        let count = incoming.len();
        self.store.replace_transactions(incoming)?;
        tracing::info!(count, "imported transaction collection");
        Ok(count)
    }

    /// Brings an account's actual balance to a target by recording an
    /// explicit, auditable adjustment transaction. Returns `None` when the
    /// balance is already within one cent of the target.
    pub fn record_correction(
        &mut self,
        account: Account,
        target: f64,
        reference: NaiveDate,
        note: Option<&str>,
    ) -> Result<Option<Transaction>, BudgetError> {
        let report = self.balances(BalanceMode::Actual, reference)?;
        let delta = target - report.balance_for(account);
        if delta.abs() <= CURRENCY_EPSILON {
            return Ok(None);
        }
        let kind = if delta > 0.0 {
            EntryKind::Income
        } else {
            EntryKind::Expense
        };
        let txn = Transaction::new(reference, delta.abs(), kind, CORRECTION_CATEGORY, account)
            .with_status(TransactionStatus::Completed)
            .with_note(note.unwrap_or("balance correction"));
        self.store.add_transaction(txn.clone())?;
        tracing::info!(%account, target, delta, "recorded balance correction");
        Ok(Some(txn))
    }
}

fn validate_transaction(txn: &Transaction) -> Result<(), BudgetError> {
    if !(txn.amount >= 0.0) {
        return Err(BudgetError::Validation(format!(
            "transaction amount must be non-negative, got {}",
            txn.amount
        )));
    }
    if txn.is_recurring != txn.recurring_id.is_some() {
        return Err(BudgetError::Validation(
            "recurring flag and rule reference must agree".into(),
        ));
    }
    Ok(())
}

fn validate_rule(rule: &RecurringRule) -> Result<(), BudgetError> {
    if !(rule.amount >= 0.0) {
        return Err(BudgetError::Validation(format!(
            "rule amount must be non-negative, got {}",
            rule.amount
        )));
    }
    if !(1..=31).contains(&rule.day_of_month) {
        return Err(BudgetError::Validation(format!(
            "rule day of month must be 1-31, got {}",
            rule.day_of_month
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn book() -> BudgetBook {
        BudgetBook::new(Box::new(MemoryStore::new()), Policy::default())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn paired_rule_links_transaction() {
        let mut book = book();
        let rule = RecurringRule::new(EntryKind::Expense, "Rent", 500.0, Account::Bank, 1);
        let rule_id = rule.id;
        let txn = Transaction::new(
            date(2025, 3, 1),
            500.0,
            EntryKind::Expense,
            "Rent",
            Account::Bank,
        );

        let stored = book.add_transaction(txn, Some(rule)).expect("add pair");
        assert!(stored.is_recurring);
        assert_eq!(stored.recurring_id, Some(rule_id));
        assert_eq!(book.rules().unwrap().len(), 1);
    }

    #[test]
    fn negative_amount_rejected() {
        let mut book = book();
        let txn = Transaction::new(
            date(2025, 3, 1),
            -5.0,
            EntryKind::Expense,
            "Rent",
            Account::Bank,
        );
        let err = book.add_transaction(txn, None).expect_err("must reject");
        assert!(matches!(err, BudgetError::Validation(_)));
    }

    #[test]
    fn correction_reaches_target_and_is_auditable() {
        let mut book = book();
        let seed = Transaction::new(
            date(2025, 3, 1),
            120.0,
            EntryKind::Income,
            "Salary",
            Account::Bank,
        )
        .with_status(TransactionStatus::Completed);
        book.add_transaction(seed, None).unwrap();

        let correction = book
            .record_correction(Account::Bank, 100.0, date(2025, 3, 10), None)
            .expect("correction")
            .expect("delta large enough");
        assert_eq!(correction.kind, EntryKind::Expense);
        assert_eq!(correction.category, CORRECTION_CATEGORY);

        let report = book
            .balances(BalanceMode::Actual, date(2025, 3, 10))
            .unwrap();
        assert!((report.bank_balance - 100.0).abs() < CURRENCY_EPSILON);

        let again = book
            .record_correction(Account::Bank, 100.0, date(2025, 3, 10), None)
            .expect("correction");
        assert!(again.is_none(), "already at target");
    }
}
