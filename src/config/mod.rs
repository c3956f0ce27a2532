use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::{CalendarError, Result},
    utils::paths::{ensure_dir, write_atomic, PathResolver},
};

pub const DEFAULT_STORAGE_KEY: &str = "finance-calendar";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default)]
    pub cloud_sync: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            cloud_sync: false,
            user_id: None,
        }
    }
}

impl Config {
    /// Cloud sync needs both the user opt-in and an identity to sync under.
    pub fn cloud_sync_allowed(&self) -> bool {
        self.cloud_sync && self.user_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data).map_err(|err| {
            CalendarError::Config(format!("{}: {}", self.path.display(), err))
        })?;
        if config.storage_key.trim().is_empty() {
            return Err(CalendarError::Config("storage key must not be empty".into()));
        }
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
