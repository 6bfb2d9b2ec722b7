//! Persistent user preferences: application title, recent files, default folder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{errors::Result, utils};

const TMP_SUFFIX: &str = "tmp";
const DEFAULT_TITLE: &str = "Money Tracker";
const DEFAULT_MAX_RECENT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_title")]
    pub title: String,
    #[serde(default)]
    pub recent_files: Vec<RecentFile>,
    #[serde(default = "Config::default_max_recent")]
    pub max_recent_files: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Folder that relative save-as targets are resolved against.
    pub default_directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentFile {
    pub path: PathBuf,
    pub opened_at: DateTime<Utc>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            recent_files: Vec::new(),
            max_recent_files: Self::default_max_recent(),
            default_directory: None,
        }
    }
}

impl Config {
    fn default_title() -> String {
        DEFAULT_TITLE.into()
    }

    fn default_max_recent() -> usize {
        DEFAULT_MAX_RECENT
    }

    /// Moves `path` to the front of the recent list and trims the list.
    pub fn push_recent(&mut self, path: &Path, opened_at: DateTime<Utc>) {
        self.recent_files.retain(|entry| entry.path != path);
        self.recent_files.insert(
            0,
            RecentFile {
                path: path.to_path_buf(),
                opened_at,
            },
        );
        self.recent_files.truncate(self.max_recent_files.max(1));
    }

    /// Resolves a relative path against `default_directory`, when one is set.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.default_directory {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Loads and stores [`Config`] as JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(utils::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: utils::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        Ok(())
    }

    /// Records `path` as the most recently used ledger file and persists it.
    pub fn record_recent(&self, path: &Path) -> Result<Config> {
        let mut config = self.load()?;
        config.push_recent(path, Utc::now());
        self.save(&config)?;
        Ok(config)
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

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
