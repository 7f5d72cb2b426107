//! Engine passes (materialization, balances, forecasting) and the
//! `BudgetBook` facade that coordinates them against a store.

pub mod balance;
pub mod book;
pub mod forecast;
pub mod materializer;

pub use balance::{compute_balances, BalanceMode, BalanceReport, CURRENCY_EPSILON};
pub use book::BudgetBook;
pub use forecast::{simulate, stabilization, DailyBalance, Stabilization, FORECAST_HORIZON_DAYS};
pub use materializer::{materialize, MaterializeFailure, MaterializeReport};
