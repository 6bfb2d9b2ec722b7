#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::Rc,
    path::{Path, PathBuf},
    sync::Mutex,
};

use money_tracker::{
    config::ConfigManager,
    core::{Prompt, Session},
    storage::CsvStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that is removed when the test binary exits.
pub fn scratch_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Answers confirmations from a queue and records what was asked.
///
/// An empty queue answers `true`.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    pub answers: VecDeque<bool>,
    pub save_path: Option<PathBuf>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn picking(path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: Some(path.into()),
            ..Self::default()
        }
    }

    fn next_answer(&mut self) -> bool {
        self.answers.pop_front().unwrap_or(true)
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        self.asked.push(format!("overwrite {}", path.display()));
        self.next_answer()
    }

    fn confirm_discard_unsaved(&mut self) -> bool {
        self.asked.push("discard".into());
        self.next_answer()
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        self.asked.push("pick".into());
        self.save_path.take()
    }
}

/// Lets a test keep inspecting a prompt after handing it to a session.
#[derive(Debug, Clone, Default)]
pub struct SharedPrompt(pub Rc<RefCell<ScriptedPrompt>>);

impl SharedPrompt {
    pub fn new(prompt: ScriptedPrompt) -> Self {
        Self(Rc::new(RefCell::new(prompt)))
    }

    pub fn asked(&self) -> Vec<String> {
        self.0.borrow().asked.clone()
    }

    pub fn queue(&self, answer: bool) {
        self.0.borrow_mut().answers.push_back(answer);
    }
}

impl Prompt for SharedPrompt {
    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        self.0.borrow_mut().confirm_overwrite(path)
    }

    fn confirm_discard_unsaved(&mut self) -> bool {
        self.0.borrow_mut().confirm_discard_unsaved()
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        self.0.borrow_mut().pick_save_path()
    }
}

pub fn session_with(prompt: impl Prompt + 'static) -> Session {
    Session::new(Box::new(CsvStorage::new()), Box::new(prompt))
}

/// Session plus a config manager rooted in its own scratch directory.
pub fn configured_session(prompt: impl Prompt + 'static) -> (Session, ConfigManager, PathBuf) {
    let base = scratch_dir();
    let config = ConfigManager::with_base_dir(base.join("config")).expect("create config manager");
    let session = session_with(prompt).with_config(config.clone());
    (session, config, base)
}
