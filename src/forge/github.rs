//! GitHub REST API client
//!
//! Blocking requests via `ureq`. Pagination follows `Link: rel="next"`
//! headers; rate-limit responses are waited out (bounded) and retried.

use super::token::GithubToken;
use super::{Forge, Reply};
use crate::config::schema::ForgeConfig;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("mdcredits/", env!("CARGO_PKG_VERSION"));
const PER_PAGE: &str = "100";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub forge backed by the public REST API
pub struct GithubForge {
    agent: ureq::Agent,
    api_url: String,
    web_url: String,
    token: Option<String>,
    max_wait: Duration,
}

impl GithubForge {
    /// Create a client from config, discovering a token if one is available
    pub fn new(config: &ForgeConfig) -> Self {
        let token = GithubToken::discover(&config.host);
        if token.is_none() {
            debug!("No GitHub token found, using anonymous access");
        }
        Self::with_token(config, token)
    }

    /// Create a client with an explicit token (or none)
    pub fn with_token(config: &ForgeConfig, token: Option<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            web_url: format!("https://{}", config.host),
            token,
            max_wait: Duration::from_secs(config.max_wait_secs),
        }
    }

    /// Fetch one page, returning its document and the next page URL
    fn fetch(&self, url: &str, params: &[(&str, &str)]) -> Option<(Value, Option<String>)> {
        for attempt in 0..=MAX_RETRIES {
            debug!("sending: GET {} {:?}", url, params);

            let mut request = self
                .agent
                .get(url)
                .header("Accept", ACCEPT)
                .header("User-Agent", USER_AGENT);

            if let Some(ref token) = self.token {
                request = request.header("Authorization", format!("Bearer {}", token));
            }
            for (key, value) in params {
                request = request.query(*key, *value);
            }

            let mut response = match request.call() {
                Ok(response) => response,
                Err(e) => {
                    debug!("request to {} failed: {}", url, e);
                    return None;
                }
            };

            let status = response.status().as_u16();
            let header = |name: &str| {
                response
                    .headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };

            if (status == 403 || status == 429) && attempt < MAX_RETRIES {
                let wait = rate_limit_wait(
                    header("x-ratelimit-remaining").as_deref(),
                    header("x-ratelimit-reset").as_deref(),
                    header("retry-after").as_deref(),
                    chrono::Utc::now().timestamp(),
                );
                if let Some(wait) = wait.filter(|w| *w <= self.max_wait) {
                    warn!("GitHub rate limit hit, waiting {}s", wait.as_secs());
                    std::thread::sleep(wait);
                    continue;
                }
            }

            if !(200..300).contains(&status) {
                debug!("request to {} returned HTTP {}", url, status);
                return None;
            }

            let next = header("link").and_then(|link| next_page_url(&link));

            let body = match response.body_mut().read_to_string() {
                Ok(body) => body,
                Err(e) => {
                    debug!("reading response from {} failed: {}", url, e);
                    return None;
                }
            };

            return match serde_json::from_str(&body) {
                Ok(value) => Some((value, next)),
                Err(e) => {
                    debug!("response from {} is not JSON: {}", url, e);
                    None
                }
            };
        }

        None
    }
}

impl Forge for GithubForge {
    fn query(&self, endpoint: &str, paginate: bool, params: &[(&str, &str)]) -> Reply {
        let url = format!("{}{}", self.api_url, endpoint);

        let mut all_params = params.to_vec();
        if paginate {
            all_params.push(("per_page", PER_PAGE));
        }

        let Some((first, mut next)) = self.fetch(&url, &all_params) else {
            return Reply::NotFound;
        };

        if !paginate {
            return Reply::Found(first);
        }

        let Value::Array(mut items) = first else {
            return Reply::Found(first);
        };

        while let Some(page_url) = next.take() {
            match self.fetch(&page_url, &[]) {
                Some((Value::Array(page), page_next)) => {
                    items.extend(page);
                    next = page_next;
                }
                Some(_) => break,
                None => return Reply::NotFound,
            }
        }

        Reply::Found(Value::Array(items))
    }

    fn profile_url(&self, login: &str) -> String {
        format!("{}/{}", self.web_url, login)
    }
}

/// Extract the `rel="next"` URL from a `Link` header
fn next_page_url(link: &str) -> Option<String> {
    link.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let url = pieces.next()?.trim();
        let is_next = pieces.any(|p| p.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        url.strip_prefix('<')
            .and_then(|u| u.strip_suffix('>'))
            .map(str::to_string)
    })
}

/// How long to wait before retrying a rate-limited request
fn rate_limit_wait(
    remaining: Option<&str>,
    reset: Option<&str>,
    retry_after: Option<&str>,
    now: i64,
) -> Option<Duration> {
    if let Some(secs) = retry_after.and_then(|s| s.trim().parse::<u64>().ok()) {
        return Some(Duration::from_secs(secs));
    }

    if remaining.map(str::trim) == Some("0") {
        let reset = reset?.trim().parse::<i64>().ok()?;
        let secs = (reset - now).max(0) as u64 + 1;
        return Some(Duration::from_secs(secs));
    }

    None
}
