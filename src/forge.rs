//! Hosted forge (GitHub) release API.

use regex::Regex;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{Error, Result};

const USER_AGENT: &str = concat!("codeinspector/", env!("CARGO_PKG_VERSION"));

/// Owner and name of a repository on the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Extract owner/repo from a remote URL on `host`.
///
/// Accepts `https://host/owner/repo(.git)` and `git@host:owner/repo(.git)`.
pub fn parse_remote_url(host: &str, url: &str) -> Option<RepoSlug> {
    let pattern = format!(r"{}[:/]([^/]+)/(.+?)(?:\.git)?/?$", regex::escape(host));
    let captures = Regex::new(&pattern).ok()?.captures(url.trim())?;
    Some(RepoSlug {
        owner: captures[1].to_string(),
        repo: captures[2].trim_end_matches(".git").to_string(),
    })
}

/// Body of a create-release request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRequest {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

impl ReleaseRequest {
    /// Published (non-draft) release `v<version>`.
    pub fn for_version(version: &str, description: Option<&str>) -> Self {
        Self {
            tag_name: format!("v{}", version),
            name: format!("Release {}", version),
            body: description
                .filter(|d| !d.is_empty())
                .map_or_else(|| format!("Version {}", version), str::to_string),
            draft: false,
            prerelease: false,
        }
    }
}

/// Subset of the created release returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub tag_name: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

/// Release creation on a hosted forge.
pub trait Forge {
    fn create_release(&self, slug: &RepoSlug, token: &str, request: &ReleaseRequest) -> Result<Release>;
}

/// GitHub REST v3 client.
pub struct GitHubForge {
    api_url: String,
}

impl GitHubForge {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    fn releases_url(&self, slug: &RepoSlug) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_url.trim_end_matches('/'),
            slug.owner,
            slug.repo
        )
    }
}

impl Forge for GitHubForge {
    #[instrument(skip(self, token, request), fields(tag = %request.tag_name))]
    fn create_release(&self, slug: &RepoSlug, token: &str, request: &ReleaseRequest) -> Result<Release> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        let response = client
            .post(self.releases_url(slug))
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
            .json(request)
            .send()?;

        let status = response.status();
        debug!(status = status.as_u16(), "release API responded");
        if !status.is_success() {
            let message = response
                .json::<ApiError>()
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("GitHub API error: {}", status.as_u16()));
            return Err(Error::ReleaseFailed(message));
        }

        Ok(response.json()?)
    }
}
