//! Declarative engine policy: the configuration tables the engine consults
//! instead of inline special cases, plus the manager that persists them.

use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::{MonthRef, PotDefinition, TransactionStatus};
use crate::errors::BudgetError;

const POLICY_FILE: &str = "policy.json";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_DIR_NAME: &str = ".budgetbook";
const HOME_ENV: &str = "BUDGETBOOK_HOME";

/// Returns the application-specific data directory, defaulting to `~/.budgetbook`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
/// Configuration tables loaded once and consulted generically by the engine.
pub struct Policy {
    /// Categories whose materialized instances start out pre-settled.
    #[serde(default)]
    pub auto_complete_categories: Vec<String>,
    /// Known one-off exceptions: (category, month) pairs a rule must not
    /// materialize for.
    #[serde(default)]
    pub skips: Vec<SkipException>,
    /// Budget pots the forecast simulator draws for.
    #[serde(default)]
    pub pots: Vec<PotDefinition>,
}

impl Policy {
    /// Initial status for a materialized instance of the given category.
    pub fn initial_status(&self, category: &str) -> TransactionStatus {
        if self
            .auto_complete_categories
            .iter()
            .any(|c| c == category)
        {
            TransactionStatus::Completed
        } else {
            TransactionStatus::Pending
        }
    }

    /// Whether materialization of this category is suppressed for the month.
    pub fn is_skipped(&self, category: &str, month: MonthRef) -> bool {
        self.skips
            .iter()
            .any(|s| s.category == category && s.month == month)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Suppresses one (category, month) materialization, modelling an obligation
/// already settled outside its normal cadence.
pub struct SkipException {
    pub category: String,
    pub month: MonthRef,
}

/// Loads and saves the policy file inside the managed data directory.
pub struct PolicyManager {
    path: PathBuf,
}

impl PolicyManager {
    pub fn new() -> Result<Self, BudgetError> {
        Self::from_base(app_data_dir())
    }

    pub fn from_base(base: PathBuf) -> Result<Self, BudgetError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(POLICY_FILE),
        })
    }

    pub fn load(&self) -> Result<Policy, BudgetError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Policy::default())
        }
    }

    pub fn save(&self, policy: &Policy) -> Result<(), BudgetError> {
        let json = serde_json::to_string_pretty(policy)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
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

fn write_atomic(path: &Path, data: &str) -> Result<(), BudgetError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
