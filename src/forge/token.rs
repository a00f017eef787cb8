//! GitHub token discovery
//!
//! Anonymous access works for everything mdcredits reads, but a token
//! raises the rate limit considerably.

use std::process::{Command, Stdio};
use tracing::debug;

/// Environment variables checked for a token, in order
pub const TOKEN_ENV_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

/// GitHub token provider
pub struct GithubToken;

impl GithubToken {
    /// Find a token in the environment or via the gh CLI
    pub fn discover(host: &str) -> Option<String> {
        Self::from_env().or_else(|| Self::from_gh(host))
    }

    /// Get a token from the environment
    pub fn from_env() -> Option<String> {
        Self::from_vars(|var| std::env::var(var).ok())
    }

    /// First non-blank value among [`TOKEN_ENV_VARS`], trimmed
    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        TOKEN_ENV_VARS.iter().find_map(|var| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .inspect(|_| debug!("Using GitHub token from ${}", var))
        })
    }

    /// Get a token from gh CLI, if installed and logged in
    pub fn from_gh(host: &str) -> Option<String> {
        debug!("Getting GitHub token from gh CLI...");

        let mut cmd = Command::new("gh");
        cmd.args(["auth", "token"]);

        if host != "github.com" {
            cmd.args(["--hostname", host]);
        }

        let output = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .ok()?;

        if !output.status.success() {
            debug!("gh auth token failed, using anonymous access");
            return None;
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }
}
