use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::prompt::Prompt;
use crate::{
    config::{Config, ConfigManager},
    errors::{Result, TrackerError},
    ledger::{Ledger, LedgerObserver, RawTransaction, Transaction},
    storage::StorageBackend,
};

const UNTITLED_LABEL: &str = "untitled";
const DIRTY_MARKER: char = '*';

/// Whether the session is backed by a file yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Untitled,
    Bound(PathBuf),
}

/// Result of a command that may be declined or cancelled by the user.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
}

/// Owns one ledger together with its file binding and unsaved-changes flag.
///
/// Each session is an independent value owned by whoever created it; there is
/// no global registry of open sessions.
pub struct Session {
    ledger: Ledger,
    state: SessionState,
    dirty: bool,
    storage: Box<dyn StorageBackend>,
    prompt: Box<dyn Prompt>,
    config: Option<ConfigManager>,
}

impl Session {
    pub fn new(storage: Box<dyn StorageBackend>, prompt: Box<dyn Prompt>) -> Self {
        Self {
            ledger: Ledger::new(),
            state: SessionState::Untitled,
            dirty: false,
            storage,
            prompt,
            config: None,
        }
    }

    /// Records successful opens/saves as recent files and resolves relative
    /// save-as targets against the configured default directory.
    pub fn with_config(mut self, config: ConfigManager) -> Self {
        self.config = Some(config);
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn subscribe(&mut self, observer: Box<dyn LedgerObserver>) {
        self.ledger.subscribe(observer);
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn active_path(&self) -> Option<&Path> {
        match &self.state {
            SessionState::Untitled => None,
            SessionState::Bound(path) => Some(path),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// `untitled` or the bound file name, with a trailing `*` when dirty.
    pub fn label(&self) -> String {
        let mut label = match &self.state {
            SessionState::Untitled => UNTITLED_LABEL.to_string(),
            SessionState::Bound(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        };
        if self.dirty {
            label.push(DIRTY_MARKER);
        }
        label
    }

    pub fn window_title(&self, config: &Config) -> String {
        format!("{} - {}", config.title, self.label())
    }

    /// Discards the ledger and file binding. Unsaved work is not persisted.
    pub fn new_ledger(&mut self) {
        self.ledger.replace_all(Vec::new());
        self.state = SessionState::Untitled;
        self.dirty = false;
        info!("started new ledger");
    }

    /// Loads the ledger at `selection`; `None` is a cancelled pick.
    ///
    /// On a decode or I/O failure the current ledger and binding are kept.
    pub fn open(&mut self, selection: Option<&Path>) -> Result<Outcome> {
        let Some(path) = selection else {
            return Ok(Outcome::Cancelled);
        };
        let transactions = self.storage.load(path)?;
        let count = transactions.len();
        self.ledger.replace_all(transactions);
        self.state = SessionState::Bound(path.to_path_buf());
        self.dirty = false;
        self.remember(path);
        info!(path = %path.display(), count, "opened ledger");
        Ok(Outcome::Completed)
    }

    /// Marks the session as having unsaved changes.
    pub fn record_mutation(&mut self) {
        self.dirty = true;
    }

    /// Writes to the bound file after the user confirms the overwrite. An
    /// untitled session asks for a target and continues as [`Session::save_as`].
    pub fn save(&mut self) -> Result<Outcome> {
        let Some(path) = self.active_path().map(Path::to_path_buf) else {
            let selection = self.prompt.pick_save_path();
            return self.save_as(selection.as_deref());
        };
        if !self.prompt.confirm_overwrite(&path) {
            return Ok(Outcome::Cancelled);
        }
        self.storage.save(self.ledger.transactions(), &path)?;
        self.dirty = false;
        info!(path = %path.display(), count = self.ledger.len(), "saved ledger");
        Ok(Outcome::Completed)
    }

    /// Writes to `selection` (extension added if missing) and binds to it.
    pub fn save_as(&mut self, selection: Option<&Path>) -> Result<Outcome> {
        let Some(requested) = selection else {
            return Ok(Outcome::Cancelled);
        };
        let path = self.storage.normalize_path(&self.resolve(requested));
        self.storage.save(self.ledger.transactions(), &path)?;
        self.remember(&path);
        info!(path = %path.display(), count = self.ledger.len(), "saved ledger as");
        self.state = SessionState::Bound(path);
        self.dirty = false;
        Ok(Outcome::Completed)
    }

    /// Validates raw fields and appends the resulting transaction.
    pub fn request_add(&mut self, raw: &RawTransaction) -> Result<()> {
        let transaction = Transaction::from_raw(raw)?;
        self.ledger.add(transaction);
        self.record_mutation();
        Ok(())
    }

    /// Removes the selected row and returns the row that should be selected next.
    pub fn request_remove(&mut self, selected: Option<usize>) -> Result<Option<usize>> {
        let index = selected.ok_or(TrackerError::IndexOutOfRange {
            index: None,
            len: self.ledger.len(),
        })?;
        self.ledger.remove_at(index)?;
        self.record_mutation();
        Ok(index
            .checked_sub(1)
            .filter(|previous| *previous < self.ledger.len()))
    }

    /// Reinserts the last removed transaction, returning its row.
    pub fn undo_remove(&mut self) -> Option<usize> {
        let index = self.ledger.undo_remove()?;
        self.record_mutation();
        Some(index)
    }

    /// [`Session::new_ledger`], after confirming that unsaved work may be lost.
    pub fn request_new(&mut self) -> Outcome {
        if !self.may_discard() {
            return Outcome::Cancelled;
        }
        self.new_ledger();
        Outcome::Completed
    }

    /// [`Session::open`], after confirming that unsaved work may be lost.
    pub fn request_open(&mut self, selection: Option<&Path>) -> Result<Outcome> {
        if selection.is_none() || !self.may_discard() {
            return Ok(Outcome::Cancelled);
        }
        self.open(selection)
    }

    pub fn request_save(&mut self) -> Result<Outcome> {
        self.save()
    }

    pub fn request_save_as(&mut self, selection: Option<&Path>) -> Result<Outcome> {
        self.save_as(selection)
    }

    fn may_discard(&mut self) -> bool {
        !self.dirty || self.prompt.confirm_discard_unsaved()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        let Some(manager) = &self.config else {
            return path.to_path_buf();
        };
        match manager.load() {
            Ok(config) => config.resolve(path),
            Err(err) => {
                warn!(error = %err, "could not read configuration; using path as given");
                path.to_path_buf()
            }
        }
    }

    fn remember(&self, path: &Path) {
        if let Some(manager) = &self.config {
            if let Err(err) = manager.record_recent(path) {
                warn!(path = %path.display(), error = %err, "could not record recent file");
            }
        }
    }
}
