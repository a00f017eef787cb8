//! Error types for mdcredits
//!
//! All modules use `CreditsResult<T>` as their return type. Forge failures
//! are never errors: they surface as `Reply::NotFound` instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mdcredits operations
pub type CreditsResult<T> = Result<T, CreditsError>;

/// All errors that can occur in mdcredits
#[derive(Error, Debug)]
pub enum CreditsError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown format '{0}'")]
    UnknownFormat(String),

    #[error("Bad format spec: {0}")]
    BadFormat(String),

    // Cache errors
    #[error("Failed to open cache file {path}: {source}")]
    CacheOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to lock cache file {path}: {source}")]
    CacheLock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cache file {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Document errors
    #[error("Can't process {path}: unpaired <!--authors-->/<!--endauthors--> at line {line}")]
    UnpairedMarker { path: PathBuf, line: usize },

    // Repository errors
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl CreditsError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownFormat(_) => Some("Run: mdcredits formats"),
            Self::CacheLock { .. } | Self::CacheWrite { .. } | Self::CacheOpen { .. } => {
                Some("Check permissions of the cache file, or run: mdcredits cache path")
            }
            Self::UnpairedMarker { .. } => {
                Some("Every <!-- authors --> line needs a matching <!-- endauthors --> line")
            }
            Self::Git(_) => Some("Run inside a git repository, or pass --repo <path>"),
            _ => None,
        }
    }
}
