//! Two-tier key-value cache
//!
//! The memory tier lives for one run. The disk tier is a single JSON object
//! shared by every run on the machine; reads hold a shared lock, writes an
//! exclusive one, and every change is flushed before the call returns.

use crate::error::{CreditsError, CreditsResult};
use fs2::FileExt;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the persistent cache inside the user cache directory
pub const CACHE_FILE_NAME: &str = "mdcredits.json";

const KEY_SEPARATOR: char = ':';

/// Cache service shared by all resolution steps of a run
#[derive(Debug)]
pub struct Cache {
    path: PathBuf,
    refresh: bool,
    mem: HashMap<String, String>,
    disk: BTreeMap<String, String>,
    /// Keys already forced to miss once under refresh mode
    refreshed: HashSet<String>,
}

impl Cache {
    /// Open the persistent cache at `path`, creating the file if needed.
    ///
    /// With `refresh` set, every key reads as a miss the first time it is
    /// looked up in this run.
    pub fn open(path: impl Into<PathBuf>, refresh: bool) -> CreditsResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| CreditsError::CacheOpen {
                    path: path.clone(),
                    source: e,
                })?;
            }
        }

        let disk = load_document(&path)?;
        debug!("loaded {} entries from {}", disk.len(), path.display());

        Ok(Self {
            path,
            refresh,
            mem: HashMap::new(),
            disk,
            refreshed: HashSet::new(),
        })
    }

    /// Default location of the persistent cache
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CACHE_FILE_NAME)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of persisted entries
    pub fn len(&self) -> usize {
        self.disk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disk.is_empty()
    }

    /// Store a value for the rest of this run only
    pub fn mem_store(&mut self, keys: &[&str], value: impl Into<String>) {
        self.mem.insert(join_key(keys), value.into());
    }

    /// Load a value stored earlier in this run
    pub fn mem_load(&self, keys: &[&str]) -> Option<String> {
        self.mem.get(&join_key(keys)).cloned()
    }

    /// Persist a value, rewriting the cache file if it changed
    pub fn disk_store(&mut self, keys: &[&str], value: &str) -> CreditsResult<()> {
        let key = join_key(keys);

        if self.disk.get(&key).is_some_and(|v| v == value) {
            return Ok(());
        }

        debug!("cache store: {:?} {:?}", key, value);
        self.disk.insert(key, value.to_string());

        save_document(&self.path, &self.disk)
    }

    /// Load a persisted value, honoring refresh mode
    pub fn disk_load(&mut self, keys: &[&str]) -> Option<String> {
        let key = join_key(keys);

        // first lookup of a key misses under refresh, whether or not it was persisted
        if self.refresh && self.refreshed.insert(key.clone()) {
            debug!("cache reset: {:?}", key);
            return None;
        }

        let Some(value) = self.disk.get(&key) else {
            debug!("cache miss: {:?}", key);
            return None;
        };

        debug!("cache hit: {:?} {:?}", key, value);
        Some(value.clone())
    }
}

/// Join key segments, escaping the separator inside segments
fn join_key(keys: &[&str]) -> String {
    keys.iter()
        .map(|k| k.replace('%', "%25").replace(KEY_SEPARATOR, "%3A"))
        .collect::<Vec<_>>()
        .join(&KEY_SEPARATOR.to_string())
}

fn open_file(path: &Path) -> CreditsResult<File> {
    OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(|e| CreditsError::CacheOpen {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Read the whole document under a shared lock.
///
/// Unparseable content is treated as an empty cache.
fn load_document(path: &Path) -> CreditsResult<BTreeMap<String, String>> {
    let mut file = open_file(path)?;

    FileExt::lock_shared(&file).map_err(|e| CreditsError::CacheLock {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut content = String::new();
    let read = file.read_to_string(&mut content);
    let _ = FileExt::unlock(&file);

    read.map_err(|e| CreditsError::CacheOpen {
        path: path.to_path_buf(),
        source: e,
    })?;

    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    match serde_json::from_str(&content) {
        Ok(doc) => Ok(doc),
        Err(e) => {
            debug!("ignoring malformed cache {}: {}", path.display(), e);
            Ok(BTreeMap::new())
        }
    }
}

/// Replace the whole document under an exclusive lock
fn save_document(path: &Path, doc: &BTreeMap<String, String>) -> CreditsResult<()> {
    let body = serde_json::to_string_pretty(doc)?;
    let mut file = open_file(path)?;

    FileExt::lock_exclusive(&file).map_err(|e| CreditsError::CacheLock {
        path: path.to_path_buf(),
        source: e,
    })?;

    let written = (|| -> std::io::Result<()> {
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(body.as_bytes())?;
        file.flush()
    })();
    let _ = FileExt::unlock(&file);

    written.map_err(|e| CreditsError::CacheWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
