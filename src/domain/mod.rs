//! Pure domain models (transactions, rules, pots) and shared enums.
//! No I/O, no storage interactions. Only data types and calendar arithmetic.

pub mod common;
pub mod pot;
pub mod rule;
pub mod transaction;

pub use common::{days_in_month, Account, EntryKind, Identifiable, MonthRef};
pub use pot::{PotDefinition, PotOverride};
pub use rule::{Frequency, RecurringRule};
pub use transaction::{Transaction, TransactionStatus};
