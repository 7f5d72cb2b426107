//! Expands active recurring rules into concrete transaction instances, at
//! most one per rule and calendar month.

use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::Policy;
use crate::domain::{MonthRef, RecurringRule, Transaction};
use crate::errors::BudgetError;

#[derive(Debug)]
pub struct MaterializeFailure {
    pub rule_id: Uuid,
    pub error: BudgetError,
}

#[derive(Debug, Default)]
/// Outcome of one materialization pass. Duplicate skips are steady-state
/// behavior, not failures.
pub struct MaterializeReport {
    pub created: Vec<Transaction>,
    pub duplicate_skips: usize,
    pub policy_skips: usize,
    pub failures: Vec<MaterializeFailure>,
}

impl MaterializeReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builds the missing instances for the month containing `reference`.
///
/// For each active rule the pass skips when an instance already exists for
/// the month, skips when the policy lists a (category, month) exception, and
/// otherwise produces a transaction on the rule's clamped target day with the
/// policy-driven initial status. Pure: the caller persists the result.
pub fn materialize(
    rules: &[RecurringRule],
    existing: &[Transaction],
    reference: NaiveDate,
    policy: &Policy,
) -> MaterializeReport {
    let month = MonthRef::containing(reference);
    let mut covered: HashSet<Uuid> = existing
        .iter()
        .filter(|txn| txn.is_recurring && txn.in_month(month))
        .filter_map(|txn| txn.recurring_id)
        .collect();

    let mut report = MaterializeReport::default();
    for rule in rules.iter().filter(|rule| rule.active) {
        if covered.contains(&rule.id) {
            report.duplicate_skips += 1;
            continue;
        }
        if policy.is_skipped(&rule.category, month) {
            tracing::debug!(rule = %rule.id, category = %rule.category, %month, "materialization suppressed by skip exception");
            report.policy_skips += 1;
            continue;
        }
        let date = rule.effective_date(month);
        let status = policy.initial_status(&rule.category);
        let txn = Transaction::from_rule(rule, date, status);
        covered.insert(rule.id);
        report.created.push(txn);
    }

    tracing::debug!(
        %month,
        created = report.created.len(),
        duplicates = report.duplicate_skips,
        skipped = report.policy_skips,
        "materialization pass built instances"
    );
    report
}
