//! Author identity resolution
//!
//! Maps a (name, email) pair from git history to a forge account, then fills
//! in missing email and full name from that account's commits and profile.
//! Every lookup is cached on disk, negative results included, so a second
//! run over the same history issues no requests at all.

mod commits;

pub use commits::pick_commit_author;

use crate::author::{has_whitespace, Author, RawAuthor};
use crate::cache::Cache;
use crate::error::CreditsResult;
use crate::forge::{str_at, Forge};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Cache namespace for everything resolved through GitHub
pub(crate) const NS: &str = "github";

/// New logins taken from a search by name
const NAME_SEARCH_LIMIT: usize = 3;

static NOREPLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+\+)?([^@]+)@users\.noreply\.github\.com$").expect("valid regex")
});

/// Login encoded in a GitHub no-reply address, if `email` is one
pub fn noreply_login(email: &str) -> Option<&str> {
    NOREPLY_RE
        .captures(email)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Whether `email` is a GitHub no-reply address
pub fn is_noreply(email: &str) -> bool {
    NOREPLY_RE.is_match(email)
}

/// Resolves authors against a forge, caching through [`Cache`]
pub struct Resolver<F> {
    forge: F,
    cache: Cache,
}

impl<F: Forge> Resolver<F> {
    pub fn new(forge: F, cache: Cache) -> Self {
        Self { forge, cache }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Enrich one author from history.
    ///
    /// `project` is `owner/repo`, or empty when unknown.
    pub fn populate(&mut self, raw: &RawAuthor, project: &str) -> CreditsResult<Author> {
        let mut author = Author::from_raw(raw);

        if let Some(login) = noreply_login(&raw.email) {
            author.login = login.to_string();
            author.email.clear();
        }

        if author.login.is_empty() {
            author.login = self.resolve_login(project, &raw.name, &raw.email)?;
        }

        if !author.login.is_empty() {
            author.profile = self.forge.profile_url(&author.login);
        }

        if author.email.is_empty() && !author.login.is_empty() {
            author.email = self.resolve_email(project, &author.login, &raw.name)?;
        }

        if !has_whitespace(&author.name) {
            author.name = self.resolve_name(project, &author.login, &author.name)?;
        }

        debug!(
            "resolved {:?} <{}> as login={:?} email={:?} name={:?}",
            raw.name, raw.email, author.login, author.email, author.name
        );

        Ok(author)
    }

    /// Find the forge login that authored commits as (`name`, `email`).
    ///
    /// Returns empty when nothing matches. The result, empty or not, is
    /// cached under both the name and the email.
    pub fn resolve_login(&mut self, project: &str, name: &str, email: &str) -> CreditsResult<String> {
        if name.is_empty() || email.is_empty() {
            return Ok(String::new());
        }

        let cached = self
            .cache
            .disk_load(&[NS, "n2l", name])
            .or_else(|| self.cache.disk_load(&[NS, "e2l", email]));

        let login = match cached {
            Some(login) => login,
            None => self.search_login(project, name, email)?,
        };

        self.cache.disk_store(&[NS, "n2l", name], &login)?;
        self.cache.disk_store(&[NS, "e2l", email], &login)?;

        Ok(login)
    }

    fn search_login(&mut self, project: &str, name: &str, email: &str) -> CreditsResult<String> {
        let mut candidates: Vec<String> = Vec::new();

        let by_email = format!("{} in:email", email);
        let users = self.forge.query("/search/users", false, &[("q", by_email.as_str())]);
        for user in users.items("/items") {
            push_unique(&mut candidates, str_at(user, "/login"));
        }

        // Usually the first email hit is the right account
        if let Some(login) = self.first_email_match(&candidates, project, name, email)? {
            return Ok(login);
        }

        let by_name = format!("{} in:name", name);
        let users = self.forge.query("/search/users", false, &[("q", by_name.as_str())]);
        let mut added = 0;
        for user in users.items("/items") {
            if added >= NAME_SEARCH_LIMIT {
                break;
            }
            if push_unique(&mut candidates, str_at(user, "/login")) {
                added += 1;
            }
        }

        if !has_whitespace(name) {
            push_unique(&mut candidates, name);
        }

        if let Some(login) = self.first_email_match(&candidates, project, name, email)? {
            return Ok(login);
        }

        if !project.is_empty() {
            let mut contributors = self.contributors(project);
            // Only changes which candidate is tried first
            contributors.sort_by_key(|login| strsim::levenshtein(login, name));
            for login in &contributors {
                push_unique(&mut candidates, login);
            }
        }

        for login in &candidates {
            if same_email(&self.resolve_email(project, login, name)?, email) {
                return Ok(login.clone());
            }

            if !project.is_empty() {
                let mut commits = self.contrib_commits(project, login)?;
                commits.extend(self.pullreq_commits(project, login)?);

                if commits.iter().any(|c| same_email(&c.email, email)) {
                    return Ok(login.clone());
                }
            }
        }

        Ok(String::new())
    }

    fn first_email_match(
        &mut self,
        candidates: &[String],
        project: &str,
        name: &str,
        email: &str,
    ) -> CreditsResult<Option<String>> {
        for login in candidates {
            if same_email(&self.resolve_email(project, login, name)?, email) {
                return Ok(Some(login.clone()));
            }
        }
        Ok(None)
    }

    /// Find the commit email `login` uses, anchored by `name_hint`
    pub fn resolve_email(&mut self, project: &str, login: &str, name_hint: &str) -> CreditsResult<String> {
        if login.is_empty() || name_hint.is_empty() {
            return Ok(String::new());
        }

        if let Some(email) = self.cache.disk_load(&[NS, "l2e", login]) {
            return Ok(email);
        }

        let email = self.search_email(project, login, name_hint)?;
        self.cache.disk_store(&[NS, "l2e", login], &email)?;

        Ok(email)
    }

    fn search_email(&mut self, project: &str, login: &str, name_hint: &str) -> CreditsResult<String> {
        if !project.is_empty() {
            let commits = self.contrib_commits(project, login)?;
            if let Some(commit) = pick_commit_author(&commits, name_hint) {
                return Ok(commit.email.clone());
            }

            let commits = self.pullreq_commits(project, login)?;
            if let Some(commit) = pick_commit_author(&commits, name_hint) {
                return Ok(commit.email.clone());
            }
        }

        let commits = self.event_commits(login)?;
        Ok(pick_commit_author(&commits, name_hint)
            .map(|c| c.email.clone())
            .unwrap_or_default())
    }

    /// Find the best display name for `login`.
    ///
    /// Without a login there is nothing to look up and `raw_name` is kept.
    pub fn resolve_name(&mut self, project: &str, login: &str, raw_name: &str) -> CreditsResult<String> {
        if login.is_empty() {
            return Ok(raw_name.to_string());
        }

        if let Some(name) = self.cache.disk_load(&[NS, "l2n", login]) {
            return Ok(name);
        }

        let mut commit_name = String::new();

        if !project.is_empty() {
            let commits = self.contrib_commits(project, login)?;
            if let Some(commit) = pick_commit_author(&commits, "") {
                commit_name = commit.name.clone();
            }

            if commit_name.is_empty() {
                let commits = self.pullreq_commits(project, login)?;
                if let Some(commit) = pick_commit_author(&commits, "") {
                    commit_name = commit.name.clone();
                }
            }
        }

        if commit_name.is_empty() {
            // Takes the email, not the name; kept as the established behavior
            let commits = self.event_commits(login)?;
            if let Some(commit) = pick_commit_author(&commits, "") {
                commit_name = commit.email.clone();
            }
        }

        let profile = self.forge.query(&format!("/users/{}", login), false, &[]);
        let profile_name = profile.str_at("/name");

        let name = choose_name(&commit_name, profile_name, raw_name);
        self.cache.disk_store(&[NS, "l2n", login], &name)?;

        Ok(name)
    }
}

/// Pick between name candidates: a full name beats a single token, and
/// commit data beats profile data when both are ambiguous.
fn choose_name(commit_name: &str, profile_name: &str, raw_name: &str) -> String {
    let chosen = if has_whitespace(commit_name)
        || (!commit_name.is_empty() && !has_whitespace(profile_name) && !has_whitespace(raw_name))
    {
        commit_name
    } else if has_whitespace(profile_name) || (!profile_name.is_empty() && !has_whitespace(raw_name)) {
        profile_name
    } else {
        raw_name
    };
    chosen.to_string()
}

fn same_email(a: &str, b: &str) -> bool {
    !a.is_empty() && a.to_lowercase() == b.to_lowercase()
}

/// Append `login` unless empty or already present
fn push_unique(candidates: &mut Vec<String>, login: &str) -> bool {
    if login.is_empty() || candidates.iter().any(|c| c == login) {
        return false;
    }
    candidates.push(login.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::mock::MockForge;
    use serde_json::json;
    use tempfile::TempDir;

    fn open_cache(dir: &TempDir) -> Cache {
        Cache::open(dir.path().join("cache.json"), false).unwrap()
    }

    fn commit(email: &str, name: &str) -> serde_json::Value {
        json!({"commit": {"author": {"email": email, "name": name}}})
    }

    #[test]
    fn noreply_pattern() {
        assert_eq!(noreply_login("12345+ford@users.noreply.github.com"), Some("ford"));
        assert_eq!(noreply_login("ford@users.noreply.github.com"), Some("ford"));
        assert_eq!(noreply_login("ford@betelgeuse.sid"), None);
        assert!(is_noreply("1+x@users.noreply.github.com"));
        assert!(!is_noreply("x@users.noreply.github.com.evil"));
    }

    #[test]
    fn noreply_author_resolves_without_search() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::default();
        let mut resolver = Resolver::new(&forge, open_cache(&dir));

        let raw = RawAuthor::new(
            "Ford Prefect",
            "12345+ford@users.noreply.github.com",
            "2020-01-01",
        );
        let author = resolver.populate(&raw, "").unwrap();

        assert_eq!(author.login, "ford");
        assert_eq!(author.email, "");
        assert_eq!(author.profile, "https://github.com/ford");
        assert_eq!(author.name, "Ford Prefect");
        assert!(!forge.was_queried("/search/users"));
    }

    #[test]
    fn email_search_shortcut() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::default()
            .with(
                "/search/users?q=ann@x.com in:email",
                json!({"items": [{"login": "annlee"}]}),
            )
            .with(
                "/users/annlee/events/public",
                json!([{"payload": {"commits": [
                    {"author": {"email": "ann@x.com", "name": "Ann Lee"}}
                ]}}]),
            );
        let mut resolver = Resolver::new(&forge, open_cache(&dir));

        let login = resolver.resolve_login("", "Ann Lee", "ann@x.com").unwrap();

        assert_eq!(login, "annlee");
        assert!(!forge.was_queried("/search/users?q=Ann Lee in:name"));
    }

    #[test]
    fn name_search_is_capped() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::default().with(
            "/search/users?q=Ann Lee in:name",
            json!({"items": [
                {"login": "a1"}, {"login": "a2"}, {"login": "a3"}, {"login": "a4"}
            ]}),
        );
        let mut resolver = Resolver::new(&forge, open_cache(&dir));

        let login = resolver.resolve_login("", "Ann Lee", "ann@x.com").unwrap();

        assert_eq!(login, "");
        assert!(forge.was_queried("/users/a3/events/public"));
        assert!(!forge.was_queried("/users/a4/events/public"));
    }

    #[test]
    fn contributor_commits_match_raw_email() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::default()
            .with(
                "/repos/o/r/contributors",
                json!([{"login": "zaphod"}, {"login": "arthur"}]),
            )
            .with(
                "/repos/o/r/commits?author=arthur",
                json!([
                    commit("arthur@work.example", "Arthur Dent"),
                    commit("arthur@home.example", "A. Dent"),
                ]),
            );
        let mut resolver = Resolver::new(&forge, open_cache(&dir));

        let login = resolver
            .resolve_login("o/r", "Arthur Dent", "arthur@home.example")
            .unwrap();

        assert_eq!(login, "arthur");
    }

    #[test]
    fn pullreq_commits_match_raw_email() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::default()
            .with("/repos/o/r/contributors", json!([{"login": "arthur"}]))
            .with(
                "/search/issues?q=type:pr repo:o/r author:arthur",
                json!({"items": [{"number": 7}]}),
            )
            .with("/repos/o/r/pulls/7", json!({"merged": true}))
            .with(
                "/repos/o/r/pulls/7/commits",
                json!([
                    commit("arthur@work.example", "Arthur Dent"),
                    commit("arthur@home.example", "A. Dent"),
                ]),
            );
        let mut resolver = Resolver::new(&forge, open_cache(&dir));

        let login = resolver
            .resolve_login("o/r", "Arthur Dent", "arthur@home.example")
            .unwrap();

        assert_eq!(login, "arthur");
        assert_eq!(forge.times_queried("/repos/o/r/commits?author=arthur"), 1);
    }

    #[test]
    fn closest_contributor_is_tried_first() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::default().with(
            "/repos/o/r/contributors",
            json!([
                {"login": "zzzzzzzzzz"},
                {"login": "Ann_Lee"},
                {"login": "AnnLee"},
                {"login": "Ann-Lee"}
            ]),
        );
        let mut resolver = Resolver::new(&forge, open_cache(&dir));

        let login = resolver.resolve_login("o/r", "Ann Lee", "ann@x.com").unwrap();
        assert_eq!(login, "");

        let prefix = "/repos/o/r/commits?author=";
        let tried: Vec<String> = forge
            .requests()
            .iter()
            .filter_map(|r| r.strip_prefix(prefix))
            .map(str::to_string)
            .collect();

        // equal distances keep contributor order
        assert_eq!(tried, vec!["Ann_Lee", "AnnLee", "Ann-Lee", "zzzzzzzzzz"]);
    }

    #[test]
    fn single_token_name_is_tried_as_login() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::default().with(
            "/users/trillian/events/public",
            json!([{"payload": {"commits": [
                {"author": {"email": "tricia@heart.of.gold", "name": "trillian"}}
            ]}}]),
        );
        let mut resolver = Resolver::new(&forge, open_cache(&dir));

        let login = resolver
            .resolve_login("", "trillian", "tricia@heart.of.gold")
            .unwrap();

        assert_eq!(login, "trillian");
    }

    #[test]
    fn negative_result_is_cached() {
        let dir = TempDir::new().unwrap();

        let first = MockForge::default();
        let mut resolver = Resolver::new(&first, open_cache(&dir));
        let login = resolver.resolve_login("o/r", "Nobody Here", "nobody@x.com").unwrap();
        assert_eq!(login, "");
        assert!(first.calls() > 0);
        drop(resolver);

        let second = MockForge::default();
        let mut resolver = Resolver::new(&second, open_cache(&dir));
        let login = resolver.resolve_login("o/r", "Nobody Here", "nobody@x.com").unwrap();
        assert_eq!(login, "");
        assert_eq!(second.calls(), 0);
    }

    #[test]
    fn cached_login_is_found_by_email_too() {
        let dir = TempDir::new().unwrap();
        let mut cache = open_cache(&dir);
        cache.disk_store(&[NS, "e2l", "ann@x.com"], "annlee").unwrap();

        let forge = MockForge::default();
        let mut resolver = Resolver::new(&forge, cache);
        let login = resolver.resolve_login("", "Ann Lee", "ann@x.com").unwrap();

        assert_eq!(login, "annlee");
        assert_eq!(forge.calls(), 0);

        let mut reopened = open_cache(&dir);
        assert_eq!(
            reopened.disk_load(&[NS, "n2l", "Ann Lee"]),
            Some("annlee".to_string())
        );
    }

    #[test]
    fn refresh_requeries_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");

        let mut seed = Cache::open(&path, false).unwrap();
        seed.disk_store(&[NS, "l2e", "ford"], "stale@old.example").unwrap();
        drop(seed);

        let forge = MockForge::default().with(
            "/users/ford/events/public",
            json!([{"payload": {"commits": [
                {"author": {"email": "ford@betelgeuse.sid", "name": "Ford Prefect"}}
            ]}}]),
        );
        let mut resolver = Resolver::new(&forge, Cache::open(&path, true).unwrap());

        let email = resolver.resolve_email("", "ford", "Ford Prefect").unwrap();
        assert_eq!(email, "ford@betelgeuse.sid");
        let calls = forge.calls();

        let again = resolver.resolve_email("", "ford", "Ford Prefect").unwrap();
        assert_eq!(again, "ford@betelgeuse.sid");
        assert_eq!(forge.calls(), calls);
    }

    #[test]
    fn refresh_queries_each_candidate_once() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::default().with(
            "/search/users?q=Ann Lee in:name",
            json!({"items": [{"login": "a1"}]}),
        );
        let cache = Cache::open(dir.path().join("cache.json"), true).unwrap();
        let mut resolver = Resolver::new(&forge, cache);

        let login = resolver.resolve_login("", "Ann Lee", "ann@x.com").unwrap();
        assert_eq!(login, "");
        assert_eq!(forge.times_queried("/users/a1/events/public"), 1);

        let calls = forge.calls();
        resolver.resolve_login("", "Ann Lee", "ann@x.com").unwrap();
        assert_eq!(forge.calls(), calls);
    }

    #[test]
    fn single_token_name_is_expanded() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::default().with(
            "/repos/o/r/commits?author=ford",
            json!([commit("ford@betelgeuse.sid", "Ford Prefect")]),
        );
        let mut resolver = Resolver::new(&forge, open_cache(&dir));

        let raw = RawAuthor::new("ford", "ford@users.noreply.github.com", "2020-01-01");
        let author = resolver.populate(&raw, "o/r").unwrap();

        assert_eq!(author.login, "ford");
        assert_eq!(author.email, "ford@betelgeuse.sid");
        assert_eq!(author.name, "Ford Prefect");
    }

    #[test]
    fn profile_name_used_when_commits_are_silent() {
        let dir = TempDir::new().unwrap();
        let forge =
            MockForge::default().with("/users/ix", json!({"login": "ix", "name": "Ford Prefect"}));
        let mut resolver = Resolver::new(&forge, open_cache(&dir));

        let name = resolver.resolve_name("o/r", "ix", "ix").unwrap();
        assert_eq!(name, "Ford Prefect");
    }

    #[test]
    fn name_without_login_is_kept() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::default();
        let mut resolver = Resolver::new(&forge, open_cache(&dir));

        assert_eq!(resolver.resolve_name("o/r", "", "zaphod").unwrap(), "zaphod");
        assert_eq!(forge.calls(), 0);
    }

    #[test]
    fn name_precedence() {
        // full commit name wins
        assert_eq!(choose_name("Ford Prefect", "Ix", "ix"), "Ford Prefect");
        // full profile name beats a bare commit token
        assert_eq!(choose_name("ford", "Ford Prefect", "ix"), "Ford Prefect");
        // bare tokens everywhere: commit data first
        assert_eq!(choose_name("ford", "ix", "fp"), "ford");
        // raw full name beats bare tokens
        assert_eq!(choose_name("ford", "ix", "Ford Prefect"), "Ford Prefect");
        // only a profile token
        assert_eq!(choose_name("", "ix", "fp"), "ix");
        // nothing found
        assert_eq!(choose_name("", "", "fp"), "fp");
        assert_eq!(choose_name("", "", ""), "");
    }

    #[test]
    fn forge_failures_degrade_to_empty() {
        let dir = TempDir::new().unwrap();
        let forge = MockForge::default();
        let mut resolver = Resolver::new(&forge, open_cache(&dir));

        let raw = RawAuthor::new("Zaphod Beeblebrox", "zaphod@heart.of.gold", "2020-01-01");
        let author = resolver.populate(&raw, "o/r").unwrap();

        assert_eq!(author.login, "");
        assert_eq!(author.profile, "");
        assert_eq!(author.email, "zaphod@heart.of.gold");
        assert_eq!(author.name, "Zaphod Beeblebrox");
    }
}
