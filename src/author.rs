//! Author records flowing through the pipeline

use serde::{Deserialize, Serialize};

/// An author as first observed in commit history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAuthor {
    pub name: String,
    pub email: String,
    /// Date of first contribution, `YYYY-MM-DD`
    pub date: String,
}

impl RawAuthor {
    pub fn new(name: impl Into<String>, email: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            date: date.into(),
        }
    }

    /// Key used by `--sort name`
    pub fn sort_key(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.email.is_empty() {
            &self.email
        } else {
            &self.date
        }
    }
}

/// An author after forge enrichment.
///
/// Every field is either a resolved value or the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub index: usize,
    pub date: String,
    pub name: String,
    pub email: String,
    pub login: String,
    pub profile: String,
}

impl Author {
    /// Author with identity fields copied from history and nothing resolved yet
    pub fn from_raw(raw: &RawAuthor) -> Self {
        Self {
            index: 0,
            date: raw.date.clone(),
            name: raw.name.clone(),
            email: raw.email.clone(),
            login: String::new(),
            profile: String::new(),
        }
    }
}

/// An (email, name) pair observed on a forge commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitIdentity {
    #[serde(rename = "e")]
    pub email: String,
    #[serde(rename = "n")]
    pub name: String,
}

impl CommitIdentity {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

/// Whether `s` looks like a full name rather than a single token
pub fn has_whitespace(s: &str) -> bool {
    s.chars().any(char::is_whitespace)
}
