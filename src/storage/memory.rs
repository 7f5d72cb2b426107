//! In-memory store backend, used by tests and by the JSON backend as its
//! working set.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Identifiable, PotOverride, RecurringRule, Transaction};
use crate::errors::BudgetError;

use super::{Result, Store};

/// Generic id-keyed record collection.
#[derive(Debug, Clone)]
struct RecordSet<T: Identifiable> {
    records: HashMap<Uuid, T>,
}

impl<T: Identifiable> Default for RecordSet<T> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

impl<T: Identifiable + Clone> RecordSet<T> {
    fn get(&self, id: Uuid) -> Option<&T> {
        self.records.get(&id)
    }

    fn add(&mut self, record: T) -> Result<()> {
        let id = record.id();
        if self.records.contains_key(&id) {
            return Err(BudgetError::DuplicateId(id));
        }
        self.records.insert(id, record);
        Ok(())
    }

    fn put(&mut self, record: T) -> Option<T> {
        self.records.insert(record.id(), record)
    }

    fn remove(&mut self, id: Uuid) -> Result<T> {
        self.records.remove(&id).ok_or(BudgetError::NotFound(id))
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    fn clear(&mut self) {
        self.records.clear();
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    transactions: RecordSet<Transaction>,
    /// Secondary index keeping transactions listable in date order.
    date_index: BTreeSet<(NaiveDate, Uuid)>,
    rules: RecordSet<RecurringRule>,
    pot_overrides: Vec<PotOverride>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn reindex(&mut self) {
        self.date_index = self
            .transactions
            .values()
            .map(|txn| (txn.date, txn.id))
            .collect();
    }
}

impl Store for MemoryStore {
    fn transactions(&self) -> Result<Vec<Transaction>> {
        let mut out = Vec::with_capacity(self.date_index.len());
        for (_, id) in &self.date_index {
            if let Some(txn) = self.transactions.get(*id) {
                out.push(txn.clone());
            }
        }
        Ok(out)
    }

    fn transaction(&self, id: Uuid) -> Result<Option<Transaction>> {
        Ok(self.transactions.get(id).cloned())
    }

    fn add_transaction(&mut self, txn: Transaction) -> Result<()> {
        let key = (txn.date, txn.id);
        self.transactions.add(txn)?;
        self.date_index.insert(key);
        Ok(())
    }

    fn put_transaction(&mut self, txn: Transaction) -> Result<()> {
        let key = (txn.date, txn.id);
        if let Some(previous) = self.transactions.put(txn) {
            self.date_index.remove(&(previous.date, previous.id));
        }
        self.date_index.insert(key);
        Ok(())
    }

    fn delete_transaction(&mut self, id: Uuid) -> Result<()> {
        let removed = self.transactions.remove(id)?;
        self.date_index.remove(&(removed.date, removed.id));
        Ok(())
    }

    fn replace_transactions(&mut self, txns: Vec<Transaction>) -> Result<()> {
        self.transactions.clear();
        for txn in txns {
            // Last record wins on id collisions inside the imported batch.
            self.transactions.put(txn);
        }
        self.reindex();
        Ok(())
    }

    fn clear_transactions(&mut self) -> Result<()> {
        self.transactions.clear();
        self.date_index.clear();
        Ok(())
    }

    fn rules(&self) -> Result<Vec<RecurringRule>> {
        let mut rules: Vec<RecurringRule> = self.rules.values().cloned().collect();
        rules.sort_by_key(|rule| (rule.day_of_month, rule.id));
        Ok(rules)
    }

    fn rule(&self, id: Uuid) -> Result<Option<RecurringRule>> {
        Ok(self.rules.get(id).cloned())
    }

    fn add_rule(&mut self, rule: RecurringRule) -> Result<()> {
        self.rules.add(rule)
    }

    fn put_rule(&mut self, rule: RecurringRule) -> Result<()> {
        self.rules.put(rule);
        Ok(())
    }

    fn delete_rule(&mut self, id: Uuid) -> Result<()> {
        self.rules.remove(id)?;
        Ok(())
    }

    fn pot_overrides(&self) -> Result<Vec<PotOverride>> {
        Ok(self.pot_overrides.clone())
    }

    fn save_pot_overrides(&mut self, overrides: Vec<PotOverride>) -> Result<()> {
        self.pot_overrides = overrides;
        Ok(())
    }
}
