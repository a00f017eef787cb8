//! Commit identities observed on the forge

use super::{is_noreply, Resolver, NS};
use crate::author::CommitIdentity;
use crate::cache::{deserialize, serialize};
use crate::error::CreditsResult;
use crate::forge::{str_at, Forge};
use crate::similarity::looks_alike;
use serde_json::Value;

/// Choose the commit identity that represents an account.
///
/// A lone non-anonymized identity is trusted outright. With several, only
/// one whose name looks like `name_hint` is accepted.
pub fn pick_commit_author<'a>(
    commits: &'a [CommitIdentity],
    name_hint: &str,
) -> Option<&'a CommitIdentity> {
    match commits {
        [] => None,
        [only] if !is_noreply(&only.email) => Some(only),
        _ if !name_hint.is_empty() => commits
            .iter()
            .find(|c| !is_noreply(&c.email) && looks_alike(&c.name, name_hint)),
        _ => None,
    }
}

impl<F: Forge> Resolver<F> {
    /// Identities on `login`'s commits in the project history
    pub(super) fn contrib_commits(&mut self, project: &str, login: &str) -> CreditsResult<Vec<CommitIdentity>> {
        if project.is_empty() || login.is_empty() {
            return Ok(Vec::new());
        }

        let key = [NS, "cc", project, login];
        if let Some(data) = self.cache.disk_load(&key) {
            let mut commits = Vec::new();
            deserialize(&data, &mut commits);
            return Ok(commits);
        }

        let reply = self.forge.query(
            &format!("/repos/{}/commits", project),
            false,
            &[("author", login)],
        );

        let mut commits = Vec::new();
        collect_identities(&mut commits, reply.items(""), "/commit/author");

        self.cache.disk_store(&key, &serialize(&commits))?;
        Ok(commits)
    }

    /// Identities on commits of `login`'s merged pull requests
    pub(super) fn pullreq_commits(&mut self, project: &str, login: &str) -> CreditsResult<Vec<CommitIdentity>> {
        if project.is_empty() || login.is_empty() {
            return Ok(Vec::new());
        }

        let key = [NS, "pc", project, login];
        if let Some(data) = self.cache.disk_load(&key) {
            let mut commits = Vec::new();
            deserialize(&data, &mut commits);
            return Ok(commits);
        }

        let query = format!("type:pr repo:{} author:{}", project, login);
        let pulls = self.forge.query("/search/issues", false, &[("q", query.as_str())]);

        let mut commits = Vec::new();
        for pull in pulls.items("/items") {
            let number = pull.get("number").and_then(Value::as_u64).unwrap_or(0);
            if number == 0 {
                continue;
            }

            let state = self
                .forge
                .query(&format!("/repos/{}/pulls/{}", project, number), false, &[]);
            if !state.bool_at("/merged") {
                continue;
            }

            let reply = self.forge.query(
                &format!("/repos/{}/pulls/{}/commits", project, number),
                true,
                &[],
            );
            collect_identities(&mut commits, reply.items(""), "/commit/author");
        }

        self.cache.disk_store(&key, &serialize(&commits))?;
        Ok(commits)
    }

    /// Identities on push events in `login`'s public activity
    pub(super) fn event_commits(&mut self, login: &str) -> CreditsResult<Vec<CommitIdentity>> {
        if login.is_empty() {
            return Ok(Vec::new());
        }

        let key = [NS, "ec", login];
        if let Some(data) = self.cache.disk_load(&key) {
            let mut commits = Vec::new();
            deserialize(&data, &mut commits);
            return Ok(commits);
        }

        let events = self
            .forge
            .query(&format!("/users/{}/events/public", login), false, &[]);

        let mut commits = Vec::new();
        for event in events.items("") {
            let pushed = event
                .pointer("/payload/commits")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            collect_identities(&mut commits, pushed, "/author");
        }

        self.cache.disk_store(&key, &serialize(&commits))?;
        Ok(commits)
    }

    /// Logins of all project contributors, cached for this run only
    pub(super) fn contributors(&mut self, project: &str) -> Vec<String> {
        if project.is_empty() {
            return Vec::new();
        }

        let key = [NS, "contrib", project];
        if let Some(data) = self.cache.mem_load(&key) {
            let mut logins = Vec::new();
            deserialize(&data, &mut logins);
            return logins;
        }

        let reply = self
            .forge
            .query(&format!("/repos/{}/contributors", project), true, &[]);

        let logins: Vec<String> = reply
            .items("")
            .iter()
            .map(|c| str_at(c, "/login"))
            .filter(|login| !login.is_empty())
            .map(str::to_string)
            .collect();

        self.cache.mem_store(&key, serialize(&logins));
        logins
    }
}

/// Append distinct (email, name) pairs found at `pointer` in each item
fn collect_identities(out: &mut Vec<CommitIdentity>, items: &[Value], pointer: &str) {
    for item in items {
        let Some(author) = item.pointer(pointer) else {
            continue;
        };

        let email = str_at(author, "/email");
        let name = str_at(author, "/name");
        if email.is_empty() || name.is_empty() {
            continue;
        }

        let commit = CommitIdentity::new(email, name);
        if !out.contains(&commit) {
            out.push(commit);
        }
    }
}
