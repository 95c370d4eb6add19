// The release selected for this run.

use crate::schemas::common::ReleaseAsset;
use std::fmt;

/// How the release tag was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseSource {
    /// Requested through `--version-tag` / `MTEST_DIST_VERSION` and friends.
    Explicit,
    /// Reported by the release host as its latest release.
    RemoteLatest,
    /// The installer's own packaged version.
    LocalFallback,
}

impl fmt::Display for ReleaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReleaseSource::Explicit => "explicit",
            ReleaseSource::RemoteLatest => "remote-latest",
            ReleaseSource::LocalFallback => "local-fallback",
        };
        f.write_str(label)
    }
}

/// Tag plus whatever asset metadata the release host gave us for it.
/// `assets` is empty whenever the metadata could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseContext {
    pub tag: String,
    pub source: ReleaseSource,
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseContext {
    /// Values for `{tag}` / `{version}` placeholders in user-supplied overrides.
    pub fn template_values(&self) -> TemplateValues {
        TemplateValues {
            tag: self.tag.clone(),
            version: self
                .tag
                .strip_prefix('v')
                .unwrap_or(&self.tag)
                .to_string(),
        }
    }
}

/// `{tag}` is the normalized tag (`v1.4.0`), `{version}` the same without the marker (`1.4.0`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateValues {
    pub tag: String,
    pub version: String,
}

impl TemplateValues {
    /// Replaces every `{tag}` and `{version}` occurrence in `template`.
    pub fn apply(&self, template: &str) -> String {
        template
            .replace("{tag}", &self.tag)
            .replace("{version}", &self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(tag: &str) -> ReleaseContext {
        ReleaseContext {
            tag: tag.to_string(),
            source: ReleaseSource::Explicit,
            assets: Vec::new(),
        }
    }

    #[test]
    fn version_strips_marker() {
        let values = context("v1.4.0").template_values();
        assert_eq!(values.tag, "v1.4.0");
        assert_eq!(values.version, "1.4.0");
    }

    #[test]
    fn apply_replaces_every_placeholder() {
        let values = context("v2.0.0").template_values();
        assert_eq!(
            values.apply("https://cdn.example/{tag}/mtest-{version}-{version}.zip"),
            "https://cdn.example/v2.0.0/mtest-2.0.0-2.0.0.zip"
        );
        assert_eq!(values.apply("no placeholders"), "no placeholders");
    }

    #[test]
    fn source_labels() {
        assert_eq!(ReleaseSource::RemoteLatest.to_string(), "remote-latest");
        assert_eq!(ReleaseSource::LocalFallback.to_string(), "local-fallback");
    }
}
