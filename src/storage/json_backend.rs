//! Write-through JSON persistence: every mutation lands on disk via an
//! atomic temp-file + rename before it becomes visible in the working set.

use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::config::app_data_dir;
use crate::domain::{PotOverride, RecurringRule, Transaction};
use crate::errors::BudgetError;

use super::{MemoryStore, Result, Store};

const STORE_FILE: &str = "book.json";
const TMP_SUFFIX: &str = "tmp";

pub const STORE_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct BookSnapshot {
    #[serde(default = "snapshot_schema_default")]
    schema_version: u8,
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    rules: Vec<RecurringRule>,
    #[serde(default)]
    pot_overrides: Vec<PotOverride>,
}

fn snapshot_schema_default() -> u8 {
    STORE_SCHEMA_VERSION
}

pub struct JsonStore {
    root: PathBuf,
    file: PathBuf,
    cache: MemoryStore,
}

impl JsonStore {
    /// Opens (or creates) the store under `root`, defaulting to the managed
    /// data directory.
    pub fn open(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        fs::create_dir_all(&root)?;
        let file = root.join(STORE_FILE);
        let mut cache = MemoryStore::new();
        if file.exists() {
            let data = fs::read_to_string(&file)?;
            let snapshot: BookSnapshot = serde_json::from_str(&data)?;
            if snapshot.schema_version > STORE_SCHEMA_VERSION {
                return Err(BudgetError::StoreUnavailable(format!(
                    "store schema v{} is newer than supported v{}",
                    snapshot.schema_version, STORE_SCHEMA_VERSION
                )));
            }
            cache.replace_transactions(snapshot.transactions)?;
            for rule in snapshot.rules {
                cache.put_rule(rule)?;
            }
            cache.save_pot_overrides(snapshot.pot_overrides)?;
        }
        Ok(Self { root, file, cache })
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Runs a mutation against a copy of the working set, persists the copy,
    /// and only then swaps it in. A failed write leaves both the file and the
    /// visible state untouched.
    fn commit<F>(&mut self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut MemoryStore) -> Result<()>,
    {
        let mut next = self.cache.clone();
        mutate(&mut next)?;
        self.persist(&next)?;
        self.cache = next;
        Ok(())
    }

    fn persist(&self, state: &MemoryStore) -> Result<()> {
        if !self.root.exists() {
            return Err(BudgetError::StoreUnavailable(format!(
                "data directory {} is gone",
                self.root.display()
            )));
        }
        let snapshot = BookSnapshot {
            schema_version: STORE_SCHEMA_VERSION,
            transactions: state.transactions()?,
            rules: state.rules()?,
            pot_overrides: state.pot_overrides()?,
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        let tmp = tmp_path(&self.file);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.file)?;
        Ok(())
    }
}

impl Store for JsonStore {
    fn transactions(&self) -> Result<Vec<Transaction>> {
        self.cache.transactions()
    }

    fn transaction(&self, id: Uuid) -> Result<Option<Transaction>> {
        self.cache.transaction(id)
    }

    fn add_transaction(&mut self, txn: Transaction) -> Result<()> {
        self.commit(|state| state.add_transaction(txn))
    }

    fn put_transaction(&mut self, txn: Transaction) -> Result<()> {
        self.commit(|state| state.put_transaction(txn))
    }

    fn delete_transaction(&mut self, id: Uuid) -> Result<()> {
        self.commit(|state| state.delete_transaction(id))
    }

    fn replace_transactions(&mut self, txns: Vec<Transaction>) -> Result<()> {
        self.commit(|state| state.replace_transactions(txns))
    }

    fn clear_transactions(&mut self) -> Result<()> {
        self.commit(|state| state.clear_transactions())
    }

    fn rules(&self) -> Result<Vec<RecurringRule>> {
        self.cache.rules()
    }

    fn rule(&self, id: Uuid) -> Result<Option<RecurringRule>> {
        self.cache.rule(id)
    }

    fn add_rule(&mut self, rule: RecurringRule) -> Result<()> {
        self.commit(|state| state.add_rule(rule))
    }

    fn put_rule(&mut self, rule: RecurringRule) -> Result<()> {
        self.commit(|state| state.put_rule(rule))
    }

    fn delete_rule(&mut self, id: Uuid) -> Result<()> {
        self.commit(|state| state.delete_rule(id))
    }

    fn pot_overrides(&self) -> Result<Vec<PotOverride>> {
        self.cache.pot_overrides()
    }

    fn save_pot_overrides(&mut self, overrides: Vec<PotOverride>) -> Result<()> {
        self.commit(|state| state.save_pot_overrides(overrides))
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
