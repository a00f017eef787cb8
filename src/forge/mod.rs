//! Read-only access to the code-hosting service
//!
//! Every query either yields a JSON document or [`Reply::NotFound`]. Network
//! errors, HTTP errors and undecodable bodies all collapse into `NotFound`,
//! so callers simply move on to their next heuristic.

pub mod github;
#[cfg(test)]
pub(crate) mod mock;
pub mod project;
pub mod token;

pub use github::GithubForge;
pub use project::{normalize_project, parse_remote_url};

use serde_json::Value;

/// Outcome of a forge query
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Found(Value),
    NotFound,
}

impl Reply {
    /// The document, if any
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }

    /// Children of the array at `pointer` (`""` for the root)
    pub fn items(&self, pointer: &str) -> &[Value] {
        self.value()
            .and_then(|v| v.pointer(pointer))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// String at `pointer`, or empty
    pub fn str_at(&self, pointer: &str) -> &str {
        self.value().map(|v| str_at(v, pointer)).unwrap_or("")
    }

    /// Boolean at `pointer`, or false
    pub fn bool_at(&self, pointer: &str) -> bool {
        self.value()
            .and_then(|v| v.pointer(pointer))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// String at `pointer` inside `value`, or empty
pub fn str_at<'a>(value: &'a Value, pointer: &str) -> &'a str {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// A code-hosting service exposing users, commits and pull requests
pub trait Forge {
    /// Issue a GET request against `endpoint` (e.g. `/search/users`).
    ///
    /// With `paginate`, all pages are fetched and their arrays concatenated.
    fn query(&self, endpoint: &str, paginate: bool, params: &[(&str, &str)]) -> Reply;

    /// Web profile URL of `login`
    fn profile_url(&self, login: &str) -> String;
}

impl<F: Forge + ?Sized> Forge for &F {
    fn query(&self, endpoint: &str, paginate: bool, params: &[(&str, &str)]) -> Reply {
        (**self).query(endpoint, paginate, params)
    }

    fn profile_url(&self, login: &str) -> String {
        (**self).profile_url(login)
    }
}
