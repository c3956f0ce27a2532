use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    calendar::{RecurringTransaction, RecurringTransactionRecord},
    config::DEFAULT_STORAGE_KEY,
    errors::Result,
    utils::paths::{ensure_dir, write_atomic, PathResolver},
};

use super::CalendarStorage;

/// Filesystem-backed JSON store keeping the collection in `<data>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, key: &str) -> Result<Self> {
        let base = PathResolver::resolve_base(root);
        let data_dir = PathResolver::data_dir_in(&base);
        ensure_dir(&data_dir)?;
        Ok(Self {
            path: data_dir.join(format!("{}.json", canonical_key(key))),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, DEFAULT_STORAGE_KEY)
    }

    /// Store backed by an explicit file path.
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CalendarStorage for JsonStorage {
    fn load_records(&self) -> Result<Vec<RecurringTransactionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn save_transactions(&self, transactions: &[RecurringTransaction]) -> Result<()> {
        let records: Vec<RecurringTransactionRecord> =
            transactions.iter().map(RecurringTransactionRecord::from).collect();
        let json = serde_json::to_string_pretty(&records)?;
        write_atomic(&self.path, &json)
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '-').is_empty() {
        DEFAULT_STORAGE_KEY.into()
    } else {
        sanitized
    }
}
