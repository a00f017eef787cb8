//! In-memory forge for tests

use super::{Forge, Reply};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// Forge answering from canned documents and recording every request.
///
/// Requests are keyed as `endpoint?k=v&k=v` with params unencoded; anything
/// without a canned document is `NotFound`.
#[derive(Default)]
pub struct MockForge {
    replies: HashMap<String, Value>,
    requests: RefCell<Vec<String>>,
}

impl MockForge {
    pub fn with(mut self, request: &str, document: Value) -> Self {
        self.replies.insert(request.to_string(), document);
        self
    }

    /// Number of queries issued so far
    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Whether any issued request starts with `prefix`
    pub fn was_queried(&self, prefix: &str) -> bool {
        self.times_queried(prefix) > 0
    }

    /// Number of issued requests starting with `prefix`
    pub fn times_queried(&self, prefix: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }

    /// Issued requests in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

fn request_key(endpoint: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return endpoint.to_string();
    }
    let query: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{}?{}", endpoint, query.join("&"))
}

impl Forge for MockForge {
    fn query(&self, endpoint: &str, _paginate: bool, params: &[(&str, &str)]) -> Reply {
        let key = request_key(endpoint, params);
        self.requests.borrow_mut().push(key.clone());

        match self.replies.get(&key) {
            Some(document) => Reply::Found(document.clone()),
            None => Reply::NotFound,
        }
    }

    fn profile_url(&self, login: &str) -> String {
        format!("https://github.com/{}", login)
    }
}
