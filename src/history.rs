//! Author extraction from git history

use crate::author::RawAuthor;
use crate::error::CreditsResult;
use crate::forge::parse_remote_url;
use chrono::{DateTime, FixedOffset};
use git2::{ErrorCode, Repository, Signature};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Collect distinct authors reachable from HEAD, oldest first.
///
/// The repository mailmap is applied. An author whose name or email was
/// already seen is skipped.
pub fn collect_authors(repo_path: &Path) -> CreditsResult<Vec<RawAuthor>> {
    let repo = Repository::discover(repo_path)?;

    if let Err(e) = repo.head() {
        if e.code() == ErrorCode::UnbornBranch {
            debug!("repository has no commits yet");
            return Ok(Vec::new());
        }
        return Err(e.into());
    }

    let mailmap = repo.mailmap().ok();

    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;
    revwalk.set_sorting(git2::Sort::TIME | git2::Sort::REVERSE)?;

    let mut authors = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;
        let signature = match mailmap {
            Some(ref mailmap) => commit.author_with_mailmap(mailmap)?,
            None => commit.author().to_owned(),
        };

        let author = raw_author(&signature);
        if seen.contains(&author.name) || seen.contains(&author.email) {
            continue;
        }

        seen.insert(author.name.clone());
        seen.insert(author.email.clone());
        authors.push(author);
    }

    debug!("found {} authors in git log", authors.len());
    Ok(authors)
}

fn raw_author(signature: &Signature<'_>) -> RawAuthor {
    let when = signature.when();
    let date = FixedOffset::east_opt(when.offset_minutes() * 60)
        .zip(DateTime::from_timestamp(when.seconds(), 0))
        .map(|(offset, utc)| utc.with_timezone(&offset).format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    RawAuthor::new(
        String::from_utf8_lossy(signature.name_bytes()).trim(),
        String::from_utf8_lossy(signature.email_bytes()).trim(),
        date,
    )
}

/// Guess `owner/repo` from the repository's remotes.
///
/// `origin` wins; otherwise the first remote pointing at `host`. Returns
/// empty when nothing matches.
pub fn detect_project(repo_path: &Path, host: &str) -> String {
    let repo = match Repository::discover(repo_path) {
        Ok(repo) => repo,
        Err(e) => {
            debug!("can't open repository for project detection: {}", e);
            return String::new();
        }
    };

    let remotes = match repo.remotes() {
        Ok(remotes) => remotes,
        Err(e) => {
            debug!("can't list remotes: {}", e);
            return String::new();
        }
    };

    let mut first: Option<String> = None;

    for name in remotes.iter().flatten() {
        let Ok(remote) = repo.find_remote(name) else {
            continue;
        };
        let Some(project) = remote.url().and_then(|url| parse_remote_url(url, host)) else {
            continue;
        };

        if name == "origin" {
            first = Some(project);
            break;
        }
        first.get_or_insert(project);
    }

    let project = first.unwrap_or_default();
    if !project.is_empty() {
        debug!("auto-detected project {:?}", project);
    }
    project
}
