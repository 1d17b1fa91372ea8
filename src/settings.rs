//! Read-only application settings.
//!
//! Settings are loaded once, either from a TOML file:
//!
//! ```toml
//! base_dir = "/srv/topup"
//! logs_dir_name = "logs"   # optional
//! ```
//!
//! or from the environment (`TOPUP_BASE_DIR`, `TOPUP_LOGS_DIR_NAME`).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::Singleton;

pub const BASE_DIR_ENV: &str = "TOPUP_BASE_DIR";
pub const LOGS_DIR_NAME_ENV: &str = "TOPUP_LOGS_DIR_NAME";

fn default_logs_dir_name() -> String {
    "logs".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub base_dir: PathBuf,
    #[serde(default = "default_logs_dir_name")]
    pub logs_dir_name: String,
}

impl Settings {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Settings {
            base_dir: base_dir.into(),
            logs_dir_name: default_logs_dir_name(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validated()
    }

    /// Build settings from `TOPUP_BASE_DIR` (default: the current directory) and
    /// `TOPUP_LOGS_DIR_NAME` (default: `logs`).
    pub fn from_env() -> Result<Self> {
        let base_dir = match env::var_os(BASE_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => env::current_dir()?,
        };
        let logs_dir_name =
            env::var(LOGS_DIR_NAME_ENV).unwrap_or_else(|_| default_logs_dir_name());

        Settings {
            base_dir,
            logs_dir_name,
        }
        .validated()
    }

    /// Directory the audit files are written to.
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join(&self.logs_dir_name)
    }

    fn validated(self) -> Result<Self> {
        if self.base_dir.as_os_str().is_empty() {
            return Err(Error::Config("base_dir must not be empty".to_string()));
        }
        if self.logs_dir_name.is_empty()
            || self.logs_dir_name.contains(['/', '\\'])
            || self.logs_dir_name == ".."
        {
            return Err(Error::Config(format!(
                "logs_dir_name must be a single directory name, got '{}'",
                self.logs_dir_name
            )));
        }
        Ok(self)
    }
}

/// The first settings handed to a registry are the settings for its lifetime.
impl Singleton for Settings {
    type Args = Settings;

    fn construct(settings: Settings) -> Self {
        settings
    }
}
