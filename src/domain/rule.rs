//! Domain model for recurring monthly obligations.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Account, EntryKind, Identifiable, MonthRef};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A template describing an obligation that materializes once per month.
pub struct RecurringRule {
    pub id: Uuid,
    pub kind: EntryKind,
    pub category: String,
    /// Non-negative magnitude; the sign is carried by `kind`.
    pub amount: f64,
    pub account: Account,
    /// Target day 1-31; clamped to the month's last day when shorter.
    pub day_of_month: u32,
    pub active: bool,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Audit timestamp, never used in financial math.
    pub created_at: DateTime<Utc>,
}

impl RecurringRule {
    pub fn new(
        kind: EntryKind,
        category: impl Into<String>,
        amount: f64,
        account: Account,
        day_of_month: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            category: category.into(),
            amount,
            account,
            day_of_month,
            active: true,
            frequency: Frequency::Monthly,
            method: None,
            note: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// The concrete date this rule lands on within a month, with the target
    /// day clamped to the month's last day.
    pub fn effective_date(&self, month: MonthRef) -> NaiveDate {
        match self.frequency {
            Frequency::Monthly => month.clamp_day(self.day_of_month),
        }
    }

    /// Whether the rule's cadence lands exactly on the given date.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        match self.frequency {
            Frequency::Monthly => self.effective_date(MonthRef::containing(date)) == date,
        }
    }

    pub fn signed_amount(&self) -> f64 {
        self.kind.signed(self.amount)
    }
}

impl Identifiable for RecurringRule {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
/// Recurrence cadence. Monthly is the only cadence exercised today; matches
/// over this enum stay exhaustive so a new variant cannot silently reuse the
/// monthly schedule.
pub enum Frequency {
    #[default]
    Monthly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Monthly => "Monthly",
        };
        f.write_str(label)
    }
}
