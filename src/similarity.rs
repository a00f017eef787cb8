//! Fuzzy comparison of names
//!
//! Two strings "look alike" when they are equal ignoring case, or equal
//! after washing: transliteration to ASCII, punctuation removal, and
//! whitespace squashing.

use regex::Regex;
use std::sync::LazyLock;

static PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\s\p{L}\p{N}]+").expect("valid regex"));
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

const BOUNDARY_BEFORE: &str = r"(?:^|[^\p{L}\p{N}])";
const BOUNDARY_AFTER: &str = r"(?:$|[^\p{L}\p{N}])";

/// Check whether two names refer to the same person
pub fn looks_alike(a: &str, b: &str) -> bool {
    if eq_fold(a, b) {
        return true;
    }

    eq_fold(&wash_text(a), &wash_text(b))
}

/// Check whether `needle` occurs in `haystack` as a whole word
pub fn contains_alike(haystack: &str, needle: &str) -> bool {
    if contains_word(haystack, needle) {
        return true;
    }

    contains_word(&wash_text(haystack), &wash_text(needle))
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.trim().is_empty() {
        return false;
    }

    let pattern = format!(
        "(?i){}{}{}",
        BOUNDARY_BEFORE,
        regex::escape(needle),
        BOUNDARY_AFTER
    );

    match Regex::new(&pattern) {
        Ok(re) => re.is_match(haystack),
        Err(_) => false,
    }
}

fn eq_fold(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Reduce a string to space-separated ASCII alphanumeric words
fn wash_text(s: &str) -> String {
    let s = deunicode::deunicode(s);
    let s = PUNCT_RE.replace_all(&s, "");
    let s = SPACE_RE.replace_all(&s, " ");
    s.trim().to_string()
}
