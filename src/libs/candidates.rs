// Builds the ordered list of artifacts the installer is willing to try.
//
// The list is a pure function of the platform target, the configuration and the release
// context. It is composed of, in order:
//   1. the explicit asset override, alone, when one is configured;
//   2. release-host assets ranked by `score_asset`, when metadata is available;
//   3. heuristic names built from `<component>-<tag|version>-<os>-<arch>` plus
//      `.exe` / archive suffix permutations.
// Duplicates (same URL, or same name when there is no URL) keep their first position.

use crate::libs::config::InstallConfig;
use crate::libs::errors::InstallError;
use crate::libs::utilities::assets::rank_release_assets;
use crate::schemas::candidate::AssetCandidate;
use crate::schemas::platform::PlatformTarget;
use crate::schemas::release::{ReleaseContext, TemplateValues};
use std::collections::HashSet;
use url::Url;

const ARCHIVE_SUFFIXES: [&str; 3] = [".tar.gz", ".tgz", ".zip"];

/// Ordered candidates with first-occurrence-wins deduplication.
#[derive(Default)]
struct CandidateList {
    seen: HashSet<String>,
    candidates: Vec<AssetCandidate>,
}

impl CandidateList {
    fn push(&mut self, candidate: AssetCandidate) {
        if self.seen.insert(candidate.key().to_string()) {
            self.candidates.push(candidate);
        }
    }
}

/// Produces the candidate sequence for this run.
pub fn build_candidates(
    target: &PlatformTarget,
    config: &InstallConfig,
    release: &ReleaseContext,
) -> Vec<AssetCandidate> {
    let values = release.template_values();
    let mut list = CandidateList::default();

    if let Some(asset) = &config.asset {
        let mut candidate = AssetCandidate::named(values.apply(asset));
        if let Some(unpack) = config.unpack_override {
            candidate.unpack = unpack;
        }
        list.push(candidate);
        return list.candidates;
    }

    if config.base_url.is_none() && !release.assets.is_empty() {
        for candidate in rank_release_assets(&release.assets, target) {
            list.push(candidate);
        }
    }

    for prefix in name_prefixes(target, config, &values) {
        for name in name_variants(&prefix, target) {
            list.push(AssetCandidate::named(name));
        }
    }

    list.candidates
}

/// The prefix override, or the standard `<component>-{tag}-<os>-<arch>` and
/// `<component>-{version}-<os>-<arch>` templates (deduplicated, in that order).
fn name_prefixes(target: &PlatformTarget, config: &InstallConfig, values: &TemplateValues) -> Vec<String> {
    if let Some(prefix) = &config.asset_prefix {
        return vec![values.apply(prefix)];
    }

    let mut prefixes = Vec::with_capacity(2);
    for placeholder in ["{tag}", "{version}"] {
        let prefix = values.apply(&format!(
            "{}-{}-{}-{}",
            config.component, placeholder, target.os_tag, target.arch_tag
        ));
        if !prefixes.contains(&prefix) {
            prefixes.push(prefix);
        }
    }
    prefixes
}

/// `prefix`, `prefix.exe` (Windows targets only), then one name per archive suffix.
/// Suffixes the prefix already ends with are not doubled.
fn name_variants(prefix: &str, target: &PlatformTarget) -> Vec<String> {
    let mut names = vec![prefix.to_string()];

    if target.is_windows() && !prefix.ends_with(".exe") {
        names.push(format!("{prefix}.exe"));
    }
    for suffix in ARCHIVE_SUFFIXES {
        if !prefix.ends_with(suffix) {
            names.push(format!("{prefix}{suffix}"));
        }
    }
    names
}

/// The download root candidates without a URL are resolved against, always ending in `/`.
///
/// The configured base URL (with `{tag}` / `{version}` substituted) wins; otherwise the
/// release-download path of the repository is used.
pub fn download_root(config: &InstallConfig, release: &ReleaseContext) -> Result<Url, InstallError> {
    let values = release.template_values();
    let raw = match (&config.base_url, &config.repository) {
        (Some(base), _) => values.apply(base),
        (None, Some(repository)) => format!("https://github.com/{repository}/releases/download/{}", values.tag),
        (None, None) => {
            return Err(InstallError::Config(
                "no repository and no base URL configured; nothing to download from".to_string(),
            ));
        }
    };

    let with_slash = if raw.ends_with('/') { raw } else { format!("{raw}/") };
    Url::parse(&with_slash).map_err(|e| InstallError::Config(format!("invalid download root '{with_slash}': {e}")))
}

/// The URL a candidate is fetched from: its own URL if the release host gave one, otherwise its
/// name joined onto `root`. Absolute names (`https://...`) stay as they are.
pub fn candidate_url(candidate: &AssetCandidate, root: &Url) -> Result<String, InstallError> {
    if let Some(url) = &candidate.url {
        return Ok(url.clone());
    }
    root.join(&candidate.name)
        .map(String::from)
        .map_err(|e| InstallError::Config(format!("cannot resolve '{}' against {root}: {e}", candidate.name)))
}
