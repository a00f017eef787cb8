//! User configuration
//!
//! A single TOML file supplies defaults for the generating commands and
//! named formats. Command-line flags always win over it. A missing file is
//! the same as an empty one; `mdcredits config init` writes it out.

pub mod schema;

pub use schema::Config;

use crate::error::{CreditsError, CreditsResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Locates, reads and writes the mdcredits config file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for `<config dir>/mdcredits/config.toml`
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Manager for a file given with `--config` or `MDCREDITS_CONFIG`
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mdcredits")
            .join("config.toml")
    }

    /// Read the config file.
    ///
    /// No file means built-in defaults: modern format, history order,
    /// GitHub lookups, the user cache directory. A file that exists but
    /// does not parse is an error naming the file.
    pub fn load(&self) -> CreditsResult<Config> {
        if !self.config_path.exists() {
            debug!("no config at {}, using defaults", self.config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            CreditsError::io(format!("reading config from {}", self.config_path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| CreditsError::ConfigInvalid {
            path: self.config_path.clone(),
            reason: e.to_string(),
        })
    }

    /// Write `config` as TOML, creating the parent directory (`config init`)
    pub fn save(&self, config: &Config) -> CreditsResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| CreditsError::ConfigDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).map_err(|e| {
            CreditsError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("wrote {}", self.config_path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
