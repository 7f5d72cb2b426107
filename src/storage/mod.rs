pub mod json_backend;
pub mod memory;

use uuid::Uuid;

use crate::domain::{PotOverride, RecurringRule, Transaction};
use crate::errors::BudgetError;

pub type Result<T> = std::result::Result<T, BudgetError>;

/// Narrow persistence contract the engine depends on: two record collections
/// keyed by id (transactions listed in date order) plus the pot budget
/// overrides. Backends decide the storage technology.
pub trait Store: Send + Sync {
    /// All transactions, ordered by (date, id).
    fn transactions(&self) -> Result<Vec<Transaction>>;
    fn transaction(&self, id: Uuid) -> Result<Option<Transaction>>;
    /// Inserts a new transaction; fails with `DuplicateId` if the id exists.
    fn add_transaction(&mut self, txn: Transaction) -> Result<()>;
    /// Upserts a transaction.
    fn put_transaction(&mut self, txn: Transaction) -> Result<()>;
    /// Removes a transaction; fails with `NotFound` for unknown ids.
    fn delete_transaction(&mut self, id: Uuid) -> Result<()>;
    /// Replaces the whole collection in one step (import).
    fn replace_transactions(&mut self, txns: Vec<Transaction>) -> Result<()>;
    fn clear_transactions(&mut self) -> Result<()>;

    fn rules(&self) -> Result<Vec<RecurringRule>>;
    fn rule(&self, id: Uuid) -> Result<Option<RecurringRule>>;
    fn add_rule(&mut self, rule: RecurringRule) -> Result<()>;
    fn put_rule(&mut self, rule: RecurringRule) -> Result<()>;
    fn delete_rule(&mut self, id: Uuid) -> Result<()>;

    fn pot_overrides(&self) -> Result<Vec<PotOverride>>;
    fn save_pot_overrides(&mut self, overrides: Vec<PotOverride>) -> Result<()>;
}

pub use json_backend::{JsonStore, STORE_SCHEMA_VERSION};
pub use memory::MemoryStore;
