//! Deduplication and numbering of enriched authors
//!
//! Uniqueness keys (email, profile URL, multi-word name) identify a person
//! on their own. Weak keys (login, single-token name) only count when two
//! of them agree.

use crate::author::{has_whitespace, Author};
use crate::similarity::contains_alike;
use std::collections::HashSet;
use tracing::debug;

/// Authors admitted so far in one block
#[derive(Debug, Default)]
pub struct Roster {
    /// Block text plus lines written this run, checked in append mode
    existing: Option<String>,
    seen: HashSet<String>,
    index: usize,
    added: usize,
}

impl Roster {
    /// Roster for a block that is regenerated from scratch
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster for appending to `existing` text.
    ///
    /// Numbering continues after the existing non-blank lines.
    pub fn appending(existing: &str) -> Self {
        let index = existing.lines().filter(|l| !l.trim().is_empty()).count();
        Self {
            existing: Some(existing.to_string()),
            index,
            ..Self::default()
        }
    }

    /// Number of authors admitted
    pub fn added(&self) -> usize {
        self.added
    }

    /// Add a rendered line to the text later authors are checked against
    pub fn record(&mut self, line: &str) {
        if let Some(ref mut existing) = self.existing {
            existing.push_str(line);
        }
    }

    /// Admit `author` unless it duplicates someone already listed.
    ///
    /// Admitted authors get the next 1-based index.
    pub fn admit(&mut self, mut author: Author) -> Option<Author> {
        let (unique, weak) = identity_keys(&author);

        let mut duplicate = unique
            .iter()
            .chain(weak.iter())
            .any(|key| self.seen.contains(&key.to_lowercase()));

        if !duplicate {
            if let Some(ref existing) = self.existing {
                duplicate = already_listed(existing, &unique, &weak);
            }
        }

        for key in unique.iter().chain(weak.iter()) {
            self.seen.insert(key.to_lowercase());
        }

        if duplicate {
            debug!("dup: {} <{}> {}", author.name, author.email, author.login);
            return None;
        }

        self.index += 1;
        self.added += 1;
        author.index = self.index;
        Some(author)
    }
}

/// Split an author's identity into uniqueness keys and weak keys
fn identity_keys(author: &Author) -> (Vec<&str>, Vec<&str>) {
    let mut unique = Vec::new();
    let mut weak = Vec::new();

    if !author.email.is_empty() {
        unique.push(author.email.as_str());
    }
    if !author.profile.is_empty() {
        unique.push(author.profile.as_str());
    }
    if !author.login.is_empty() {
        weak.push(author.login.as_str());
    }
    if has_whitespace(&author.name) {
        unique.push(author.name.as_str());
    } else if !author.name.is_empty() {
        weak.push(author.name.as_str());
    }

    (unique, weak)
}

/// Whether existing text mentions one uniqueness key or two weak keys
fn already_listed(existing: &str, unique: &[&str], weak: &[&str]) -> bool {
    let matches = |keys: &[&str]| keys.iter().filter(|k| contains_alike(existing, k)).count();
    matches(unique) >= 1 || matches(weak) >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(name: &str, email: &str, login: &str) -> Author {
        Author {
            name: name.to_string(),
            email: email.to_string(),
            login: login.to_string(),
            profile: if login.is_empty() {
                String::new()
            } else {
                format!("https://github.com/{}", login)
            },
            ..Author::default()
        }
    }

    #[test]
    fn same_email_collapses_keeping_first_name() {
        let mut roster = Roster::new();

        let first = roster.admit(author("Ann Lee", "ann@x.com", "")).unwrap();
        assert!(roster.admit(author("Ann M. Lee", "ann@x.com", "")).is_none());

        assert_eq!(first.name, "Ann Lee");
        assert_eq!(first.index, 1);
        assert_eq!(roster.added(), 1);
    }

    #[test]
    fn indices_follow_admission_order() {
        let mut roster = Roster::new();
        let a = roster.admit(author("Ann Lee", "ann@x.com", "")).unwrap();
        let b = roster.admit(author("Bob Ray", "bob@x.com", "")).unwrap();
        assert_eq!((a.index, b.index), (1, 2));
    }

    #[test]
    fn weak_key_seen_earlier_is_duplicate() {
        let mut roster = Roster::new();
        roster.admit(author("Ford Prefect", "ford@x.com", "ford")).unwrap();
        assert!(roster.admit(author("Ix", "ix@y.com", "ford")).is_none());
    }

    #[test]
    fn keys_compare_case_insensitively() {
        let mut roster = Roster::new();
        roster.admit(author("Ann Lee", "Ann@X.com", "")).unwrap();
        assert!(roster.admit(author("A. Lee", "ann@x.com", "")).is_none());
    }

    #[test]
    fn append_continues_numbering() {
        let mut roster = Roster::appending("1. Ann Lee\n\n2. Bob Ray\n");
        let added = roster.admit(author("Cy Young", "cy@x.com", "")).unwrap();
        assert_eq!(added.index, 3);
    }

    #[test]
    fn append_skips_author_with_listed_unique_key() {
        let mut roster = Roster::appending("1. Ann Lee `annlee`\n");
        assert!(roster.admit(author("Ann Lee", "new@x.com", "")).is_none());
        assert_eq!(roster.added(), 0);
    }

    #[test]
    fn append_needs_two_weak_keys() {
        let mut roster = Roster::appending("1. zaphod `zbeeblebrox`\n");
        let mut both = author("zaphod", "", "zbeeblebrox");
        both.profile.clear();
        assert!(roster.admit(both).is_none());

        let mut roster = Roster::appending("1. Someone `trillian`\n");
        let mut one = author("tricia", "", "trillian");
        one.profile.clear();
        assert!(roster.admit(one).is_some());
    }

    #[test]
    fn append_checks_lines_recorded_this_run() {
        let mut roster = Roster::appending("1. Ann Lee\n");
        let first = roster.admit(author("José García", "jose@x.com", "")).unwrap();
        roster.record(&format!("{}. {} ({})\n", first.index, first.name, first.email));

        assert!(roster.admit(author("Jose Garcia", "garcia@y.com", "")).is_none());
        assert_eq!(roster.added(), 1);
    }

    #[test]
    fn record_is_ignored_outside_append_mode() {
        let mut roster = Roster::new();
        roster.record("1. José García\n");
        assert!(roster.admit(author("Jose Garcia", "garcia@y.com", "")).is_some());
    }

    #[test]
    fn append_tolerates_accent_drift() {
        let mut roster = Roster::appending("- José García (jose@x.com)\n");
        assert!(roster.admit(author("Jose Garcia", "other@x.com", "")).is_none());
    }
}
