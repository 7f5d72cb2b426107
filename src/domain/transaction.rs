//! Domain model for a single dated money movement.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Account, EntryKind, Identifiable, MonthRef};
use crate::domain::rule::RecurringRule;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Non-negative magnitude; the sign is carried by `kind`.
    pub amount: f64,
    pub kind: EntryKind,
    pub category: String,
    pub account: Account,
    pub status: TransactionStatus,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Audit timestamp, never used in financial math.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        amount: f64,
        kind: EntryKind,
        category: impl Into<String>,
        account: Account,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            kind,
            category: category.into(),
            account,
            status: TransactionStatus::Pending,
            is_recurring: false,
            recurring_id: None,
            method: None,
            note: None,
            created_at: Utc::now(),
        }
    }

    /// Builds the concrete instance a rule materializes for one month.
    pub fn from_rule(rule: &RecurringRule, date: NaiveDate, status: TransactionStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount: rule.amount,
            kind: rule.kind,
            category: rule.category.clone(),
            account: rule.account,
            status,
            is_recurring: true,
            recurring_id: Some(rule.id),
            method: rule.method.clone(),
            note: rule.note.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Contribution to a running balance: positive income, negative expense.
    pub fn signed_amount(&self) -> f64 {
        self.kind.signed(self.amount)
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    pub fn mark_completed(&mut self) {
        self.status = TransactionStatus::Completed;
    }

    pub fn in_month(&self, month: MonthRef) -> bool {
        month.contains(self.date)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Enumerates the settlement state of a transaction.
pub enum TransactionStatus {
    /// Obligation recorded but not yet realized.
    Pending,
    /// Realized movement; the only state that counts toward actual balances.
    Completed,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}
