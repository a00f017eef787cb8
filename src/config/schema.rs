//! Configuration schema for mdcredits
//!
//! Configuration is stored at `~/.config/mdcredits/config.toml`

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub general: GeneralConfig,

    /// Forge settings
    pub forge: ForgeConfig,

    /// Authors to leave out
    pub filter: FilterConfig,

    /// Cache settings
    pub cache: CacheConfig,

    /// User-defined format specs, by name
    pub formats: BTreeMap<String, String>,
}

/// General output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Format spec or name of a predefined one
    pub format: String,

    /// Sort order of new entries
    pub sort: SortOrder,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            format: "modern".to_string(),
            sort: SortOrder::Date,
        }
    }
}

/// Order in which authors are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// By first contribution, oldest first
    Date,
    /// By name, alphabetically
    Name,
}

/// Which forge enriches authors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ForgeKind {
    /// Use git history only
    None,
    /// Query the GitHub REST API
    Github,
}

impl fmt::Display for ForgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Github => "github",
        };
        write!(f, "{}", name)
    }
}

/// Forge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Forge backend
    pub kind: ForgeKind,

    /// Web host, used for profile URLs and remote detection
    pub host: String,

    /// REST API base URL
    pub api_url: String,

    /// Longest rate-limit pause before giving up on a request
    pub max_wait_secs: u64,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            kind: ForgeKind::Github,
            host: "github.com".to_string(),
            api_url: "https://api.github.com".to_string(),
            max_wait_secs: 900,
        }
    }
}

/// Author filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Emails, names and logins to leave out
    pub ignore: Vec<String>,

    /// Emails, names and logins of bot accounts
    pub bots: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ignore: vec![],
            bots: vec![
                "dependabot[bot]".to_string(),
                "badger@gitter.im".to_string(),
                "gitter-badger".to_string(),
            ],
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Override for the persistent cache file
    pub path: Option<PathBuf>,
}
