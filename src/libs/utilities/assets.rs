// Ranking of release-host assets against the platform target.
//
// The release host usually knows more about a release than our naming heuristics do, but asset
// names follow no single convention (`mtest_1.4.0_Darwin_x86_64.tar.gz`, `mtest-macos-arm64.zip`,
// ...). Each asset gets an additive score from independent name checks; anything scoring zero or
// below is not worth a download attempt.

use crate::libs::utilities::platform::{arch_aliases, os_aliases};
use crate::log_debug;
use crate::schemas::candidate::AssetCandidate;
use crate::schemas::common::ReleaseAsset;
use crate::schemas::platform::PlatformTarget;
use colored::Colorize;

const OS_MATCH: i32 = 6;
const ARCH_MATCH: i32 = 6;
const STEM_MATCH: i32 = 2;
const TARBALL_SUFFIX: i32 = 2;
const ZIP_SUFFIX: i32 = 1;
const EXE_SUFFIX: i32 = 1;
const LATEST_PENALTY: i32 = -2;

/// An asset together with its score. Only lives inside `rank_release_assets`.
struct ScoredAsset<'a> {
    asset: &'a ReleaseAsset,
    score: i32,
}

/// Scores an asset filename for `target`. Higher is a better match.
///
/// | check | weight |
/// |---|---|
/// | any OS alias in the name | +6 |
/// | any architecture alias in the name | +6 |
/// | binary stem (`mtest`) in the name | +2 |
/// | ends with `.tar.gz` / `.tgz`, else `.zip`, else `.exe` | +2 / +1 / +1 |
/// | contains `latest` | -2 |
pub fn score_asset(name: &str, target: &PlatformTarget) -> i32 {
    let normalized = name.to_lowercase();
    let mut score = 0;

    if os_aliases(target.os_tag)
        .iter()
        .any(|alias| normalized.contains(alias))
    {
        score += OS_MATCH;
    }

    if arch_aliases(target.arch_tag)
        .iter()
        .any(|alias| normalized.contains(alias))
    {
        score += ARCH_MATCH;
    }

    if normalized.contains(&target.binary_stem().to_lowercase()) {
        score += STEM_MATCH;
    }

    if normalized.ends_with(".tar.gz") || normalized.ends_with(".tgz") {
        score += TARBALL_SUFFIX;
    } else if normalized.ends_with(".zip") {
        score += ZIP_SUFFIX;
    } else if normalized.ends_with(".exe") {
        score += EXE_SUFFIX;
    }

    if normalized.contains("latest") {
        score += LATEST_PENALTY;
    }

    score
}

/// Turns release-host assets into candidates, best match first.
///
/// Assets scoring `<= 0` are dropped. The sort is stable, so equally scored
/// assets keep the order the release host reported them in.
pub fn rank_release_assets(assets: &[ReleaseAsset], target: &PlatformTarget) -> Vec<AssetCandidate> {
    let mut scored: Vec<ScoredAsset<'_>> = assets
        .iter()
        .map(|asset| ScoredAsset {
            asset,
            score: score_asset(&asset.name, target),
        })
        .inspect(|entry| {
            log_debug!("[Assets] {} scored {}", entry.asset.name.dimmed(), entry.score);
        })
        .filter(|entry| entry.score > 0)
        .collect();

    // `sort_by` is a stable sort.
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    scored
        .into_iter()
        .map(|entry| AssetCandidate::with_url(&entry.asset.name, &entry.asset.browser_download_url))
        .collect()
}
