//! Budget pots: named sub-budgets with a periodic spending limit drawn
//! against a category.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Identifiable, MonthRef};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotDefinition {
    pub id: Uuid,
    pub display_name: String,
    /// Category the pot draws against; also the key override entries match on.
    pub category: String,
    /// Days-of-month the pot withdraws on, clamped like rule days.
    pub trigger_days: Vec<u32>,
    pub default_limit: f64,
}

impl PotDefinition {
    pub fn new(
        display_name: impl Into<String>,
        category: impl Into<String>,
        trigger_days: Vec<u32>,
        default_limit: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            category: category.into(),
            trigger_days,
            default_limit,
        }
    }

    /// Active limit for a month: a month-specific override wins over a
    /// default override, which wins over the pot's own baseline.
    pub fn limit_for(&self, month: MonthRef, overrides: &[PotOverride]) -> f64 {
        if let Some(specific) = overrides
            .iter()
            .find(|o| o.category == self.category && o.month == Some(month))
        {
            return specific.limit;
        }
        if let Some(default) = overrides
            .iter()
            .find(|o| o.category == self.category && o.month.is_none())
        {
            return default.limit;
        }
        self.default_limit
    }

    /// The even share each trigger day withdraws.
    pub fn draw_amount(&self, limit: f64) -> f64 {
        limit / self.trigger_days.len().max(1) as f64
    }

    /// How many of the pot's clamped trigger days land on this date. Short
    /// months can fold several trigger days onto the last day.
    pub fn triggers_on(&self, date: NaiveDate) -> usize {
        let month = MonthRef::containing(date);
        self.trigger_days
            .iter()
            .filter(|&&day| month.clamp_day(day) == date)
            .count()
    }
}

impl Identifiable for PotDefinition {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A spending-cap override for one category, either as a new default or
/// scoped to a single calendar month.
pub struct PotOverride {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<MonthRef>,
    pub limit: f64,
}

impl PotOverride {
    pub fn default_for(category: impl Into<String>, limit: f64) -> Self {
        Self {
            category: category.into(),
            month: None,
            limit,
        }
    }

    pub fn for_month(category: impl Into<String>, month: MonthRef, limit: f64) -> Self {
        Self {
            category: category.into(),
            month: Some(month),
            limit,
        }
    }
}
