// Read-only client for the release host's REST API (GitHub's release endpoints).

use crate::libs::errors::InstallError;
use crate::log_debug;
// The subset of the release payload the installer reads (tag and assets).
use crate::schemas::common::Release;
use colored::Colorize;
// Owner/repo/tag go into the API path as percent-encoded segments.
use url::Url;

/// Talks to `GET /repos/{owner}/{repo}/releases/...`.
///
/// Every call carries `Accept: application/vnd.github+json`, the installer's user agent
/// (set on the agent), and `Authorization: Bearer <token>` when a token is configured.
pub struct ReleaseClient<'a> {
    agent: &'a ureq::Agent,
    api_root: &'a str,
    repository: &'a str,
    token: Option<&'a str>,
}

impl<'a> ReleaseClient<'a> {
    pub fn new(agent: &'a ureq::Agent, api_root: &'a str, repository: &'a str, token: Option<&'a str>) -> Self {
        ReleaseClient {
            agent,
            api_root,
            repository,
            token,
        }
    }

    /// The release the host marks as latest. `Ok(None)` when the payload has no tag.
    pub fn latest_release(&self) -> Result<Option<Release>, InstallError> {
        let release = self.get(&["releases", "latest"])?;
        Ok(release.tag_name.is_some().then_some(release))
    }

    /// The release published under `tag`.
    pub fn release_by_tag(&self, tag: &str) -> Result<Release, InstallError> {
        self.get(&["releases", "tags", tag])
    }

    /// Builds `{api_root}/repos/{owner}/{repo}/{segments...}`. Each segment is percent-encoded,
    /// so a tag like `v1.0.0+build/7` stays a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, InstallError> {
        let mut url = Url::parse(self.api_root)
            .map_err(|e| InstallError::Config(format!("invalid API URL '{}': {e}", self.api_root)))?;
        url.path_segments_mut()
            .map_err(|_| InstallError::Config(format!("API URL '{}' cannot be a base", self.api_root)))?
            .pop_if_empty()
            .push("repos")
            .extend(self.repository.split('/').filter(|part| !part.is_empty()))
            .extend(segments);
        Ok(url)
    }

    fn get(&self, segments: &[&str]) -> Result<Release, InstallError> {
        let url = self.endpoint(segments)?;
        log_debug!("[Release API] GET {}", url.as_str().blue());

        let mut request = self
            .agent
            .get(url.as_str())
            .set("Accept", "application/vnd.github+json");
        if let Some(token) = self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let response = request.call().map_err(|err| {
            InstallError::from_ureq(url.as_str(), err, |url, status| InstallError::ReleaseApi { url, status })
        })?;

        let decode_error = |reason: String| InstallError::ReleaseDecode {
            url: url.to_string(),
            reason,
        };
        let body = response.into_string().map_err(|e| decode_error(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| decode_error(e.to_string()))
    }
}
