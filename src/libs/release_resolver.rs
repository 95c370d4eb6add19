// Picks the release tag for this run and gathers whatever asset metadata the release host offers.
//
// Order of preference:
// 1. an explicitly requested version,
// 2. the host's latest release (only when the host may be queried),
// 3. the installer's own version.
// Asset metadata is always best-effort: a failed lookup leaves the asset list empty and
// candidate building falls back to naming heuristics.

use crate::libs::config::InstallConfig;
use crate::libs::errors::InstallError;
use crate::libs::release_client::ReleaseClient;
use crate::schemas::common::ReleaseAsset;
use crate::schemas::release::{ReleaseContext, ReleaseSource};
use crate::{log_debug, log_warn};
use colored::Colorize;

/// Ensures a version carries the leading `v` tag marker. Blank input yields `None`.
///
/// `normalize_tag(normalize_tag(x)) == normalize_tag(x)` for every input.
pub fn normalize_tag(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.starts_with('v') {
        Some(trimmed.to_string())
    } else {
        Some(format!("v{trimmed}"))
    }
}

/// Resolves the release context for `config`.
///
/// # Errors
/// `NoReleaseTagResolvable` when there is no explicit version, the latest release could not be
/// determined, and no fallback version is configured.
pub fn resolve_release(config: &InstallConfig, agent: &ureq::Agent) -> Result<ReleaseContext, InstallError> {
    let client = config
        .repository
        .as_deref()
        .filter(|_| config.release_host_enabled())
        .map(|repository| ReleaseClient::new(agent, &config.api_url, repository, config.token.as_deref()));

    if let Some(tag) = config.explicit_version.as_deref().and_then(normalize_tag) {
        let assets = client
            .as_ref()
            .map(|client| fetch_assets_safely(client, &tag))
            .unwrap_or_default();
        return Ok(ReleaseContext {
            tag,
            source: ReleaseSource::Explicit,
            assets,
        });
    }

    if let Some(client) = &client {
        match client.latest_release() {
            Ok(Some(release)) => {
                // Hosts may publish `1.4.0` as well as `v1.4.0`; both become `v1.4.0`.
                if let Some(tag) = release.tag_name.as_deref().and_then(normalize_tag) {
                    return Ok(ReleaseContext {
                        tag,
                        source: ReleaseSource::RemoteLatest,
                        assets: release.assets,
                    });
                }
                log_warn!("Latest release has a blank tag; falling back to the installer version");
            }
            Ok(None) => {
                log_warn!("Latest release has no tag; falling back to the installer version");
            }
            Err(err) => {
                log_warn!("Falling back to the installer version: {}", err);
            }
        }
    }

    let tag = config
        .fallback_version
        .as_deref()
        .and_then(normalize_tag)
        .ok_or(InstallError::NoReleaseTagResolvable)?;

    let assets = client
        .as_ref()
        .map(|client| fetch_assets_safely(client, &tag))
        .unwrap_or_default();

    Ok(ReleaseContext {
        tag,
        source: ReleaseSource::LocalFallback,
        assets,
    })
}

/// Asset metadata for `tag`, or an empty list if the release host cannot provide it.
fn fetch_assets_safely(client: &ReleaseClient<'_>, tag: &str) -> Vec<ReleaseAsset> {
    match client.release_by_tag(tag) {
        Ok(release) => {
            log_debug!("Release {} lists {} asset(s)", tag.cyan(), release.assets.len());
            release.assets
        }
        Err(err) => {
            log_warn!("Unable to fetch assets for {}: {}", tag.yellow(), err);
            Vec::new()
        }
    }
}
