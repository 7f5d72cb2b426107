#![doc(test(attr(deny(warnings))))]

//! Budgetbook offers the materialization, balance, and forecasting engine of
//! a personal budgeting application: recurring rules expand into monthly
//! transaction instances, balances aggregate under actual and forecast
//! semantics, and a bounded simulator projects the bank balance day by day.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use config::{app_data_dir, Policy, PolicyManager, SkipException};
pub use crate::core::{
    compute_balances, materialize, simulate, stabilization, BalanceMode, BalanceReport,
    BudgetBook, DailyBalance, MaterializeFailure, MaterializeReport, Stabilization,
    CURRENCY_EPSILON, FORECAST_HORIZON_DAYS,
};
pub use domain::{
    days_in_month, Account, EntryKind, Frequency, Identifiable, MonthRef, PotDefinition,
    PotOverride, RecurringRule, Transaction, TransactionStatus,
};
pub use errors::BudgetError;
pub use storage::{JsonStore, MemoryStore, Store, STORE_SCHEMA_VERSION};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budgetbook tracing initialized.");
    });
}
