//! Shared traits, enums, and calendar-month arithmetic for budgeting primitives.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for records kept in the store.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
/// Enumerates which balance a money movement affects.
pub enum Account {
    Bank,
    Cash,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Account::Bank => "Bank",
            Account::Cash => "Cash",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
/// Direction of a money movement; the amount itself stays non-negative.
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    /// Applies the sign carried by the kind to a magnitude.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            EntryKind::Income => amount,
            EntryKind::Expense => -amount,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "Income",
            EntryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A calendar month, the granularity at which rules materialize and pot
/// overrides are scoped.
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Option<MonthRef> {
        if (1..=12).contains(&month) {
            Some(MonthRef { year, month })
        } else {
            None
        }
    }

    /// The month a date falls in.
    pub fn containing(date: NaiveDate) -> MonthRef {
        MonthRef {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    pub fn last_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.days()).unwrap()
    }

    /// Number of days in the month.
    pub fn days(self) -> u32 {
        days_in_month(self.year, self.month)
    }

    /// Resolves a target day-of-month to a concrete date, clamping days the
    /// month does not have to its last day.
    pub fn clamp_day(self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days());
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap()
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        MonthRef::containing(date) == self
    }

    pub fn succ(self) -> MonthRef {
        if self.month == 12 {
            MonthRef {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthRef {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Day count of a calendar month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}
