//! Day-by-day bank balance projection: replays completed history up to
//! today, then layers rule-driven and pot-driven hypothetical events.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::config::Policy;
use crate::core::balance::CURRENCY_EPSILON;
use crate::domain::{Account, MonthRef, PotOverride, RecurringRule, Transaction, TransactionStatus};

/// Bounded projection horizon.
pub const FORECAST_HORIZON_DAYS: i64 = 365 * 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyBalance {
    pub date: NaiveDate,
    pub balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// When the projected balance stops dipping below zero.
pub enum Stabilization {
    /// Non-negative across the whole series (or the series is empty).
    AlreadyStable,
    /// First day after the last negative point.
    StableFrom(NaiveDate),
    /// Still negative at the end of the projected window.
    NotWithinHorizon,
}

/// Projects the bank balance for each day of `[from, to]`.
///
/// Days up to `today` replay completed history exactly; later days apply
/// active bank rules (honoring skip exceptions), already-scheduled pending
/// one-off bank transactions, and the even pot draws on their trigger days.
/// `today` is captured once by the caller, so identical inputs always yield
/// identical series. An inverted window yields an empty series and the walk
/// never exceeds the five-year horizon.
pub fn simulate(
    transactions: &[Transaction],
    rules: &[RecurringRule],
    policy: &Policy,
    pot_overrides: &[PotOverride],
    from: NaiveDate,
    to: NaiveDate,
    today: NaiveDate,
) -> Vec<DailyBalance> {
    if to < from {
        tracing::warn!(%from, %to, "inverted simulation window, returning empty series");
        return Vec::new();
    }
    let end = to.min(from + Duration::days(FORECAST_HORIZON_DAYS));

    let mut completed_by_day: HashMap<NaiveDate, f64> = HashMap::new();
    let mut pending_oneoff_by_day: HashMap<NaiveDate, f64> = HashMap::new();
    let mut opening = 0.0;
    for txn in transactions.iter().filter(|t| t.account == Account::Bank) {
        match txn.status {
            TransactionStatus::Completed => {
                if txn.date < from {
                    opening += txn.signed_amount();
                } else {
                    *completed_by_day.entry(txn.date).or_insert(0.0) += txn.signed_amount();
                }
            }
            TransactionStatus::Pending => {
                if !txn.is_recurring {
                    *pending_oneoff_by_day.entry(txn.date).or_insert(0.0) += txn.signed_amount();
                }
            }
        }
    }

    let mut series = Vec::with_capacity((end - from).num_days() as usize + 1);
    let mut balance = opening;
    let mut day = from;
    while day <= end {
        if day <= today {
            if let Some(delta) = completed_by_day.get(&day) {
                balance += delta;
            }
        } else {
            let month = MonthRef::containing(day);
            for rule in rules
                .iter()
                .filter(|rule| rule.active && rule.account == Account::Bank)
            {
                if rule.occurs_on(day) && !policy.is_skipped(&rule.category, month) {
                    balance += rule.signed_amount();
                }
            }
            if let Some(delta) = pending_oneoff_by_day.get(&day) {
                balance += delta;
            }
            for pot in &policy.pots {
                let hits = pot.triggers_on(day);
                if hits > 0 {
                    let limit = pot.limit_for(month, pot_overrides);
                    balance -= hits as f64 * pot.draw_amount(limit);
                }
            }
        }
        series.push(DailyBalance { date: day, balance });
        day = day + Duration::days(1);
    }

    series
}

/// Scans a series for the day the balance becomes permanently non-negative.
pub fn stabilization(series: &[DailyBalance]) -> Stabilization {
    let last_negative = series
        .iter()
        .rposition(|point| point.balance < -CURRENCY_EPSILON);
    match last_negative {
        None => Stabilization::AlreadyStable,
        Some(index) if index + 1 == series.len() => Stabilization::NotWithinHorizon,
        Some(index) => Stabilization::StableFrom(series[index + 1].date),
    }
}
