pub mod csv_backend;

use std::path::{Path, PathBuf};

use crate::{errors::Result, ledger::Transaction};

/// Abstraction over the file formats a session can read and write ledgers in.
pub trait StorageBackend: Send + Sync {
    /// File extension (without the dot) owned by this format.
    fn extension(&self) -> &str;

    /// Reads every transaction from `path`. Either all rows decode or none do.
    fn load(&self, path: &Path) -> Result<Vec<Transaction>>;

    /// Replaces the contents of `path` with `transactions`.
    fn save(&self, transactions: &[Transaction], path: &Path) -> Result<()>;

    /// Appends this format's extension unless `path` already carries it.
    fn normalize_path(&self, path: &Path) -> PathBuf {
        let has_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(self.extension()))
            .unwrap_or(false);
        if has_extension {
            return path.to_path_buf();
        }
        let mut raw = path.as_os_str().to_owned();
        raw.push(".");
        raw.push(self.extension());
        PathBuf::from(raw)
    }
}

pub use csv_backend::{CsvStorage, LEDGER_EXTENSION};
