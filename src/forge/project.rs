//! Project identifiers (`owner/repo`)

/// Normalize a user-supplied project to `owner/repo`.
///
/// Accepts `owner/repo`, `host/owner/repo` and full web URLs.
pub fn normalize_project(project: &str, host: &str) -> String {
    let mut s = project.trim();

    for scheme in ["https://", "http://"] {
        s = s.strip_prefix(scheme).unwrap_or(s);
    }

    let host_prefix = format!("{}/", host);
    s = s.strip_prefix(host_prefix.as_str()).unwrap_or(s);

    let s = s.trim_matches('/');
    s.strip_suffix(".git").unwrap_or(s).to_string()
}

/// Extract `owner/repo` from a remote URL pointing at `host`
pub fn parse_remote_url(url: &str, host: &str) -> Option<String> {
    let url = url.trim();

    let prefixes = [
        format!("git@{}:", host),
        format!("ssh://git@{}/", host),
        format!("https://{}/", host),
        format!("http://{}/", host),
        format!("git://{}/", host),
    ];

    let path = prefixes
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix.as_str()))?;

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let mut parts = path.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
            Some(format!("{}/{}", owner, repo))
        }
        _ => None,
    }
}
