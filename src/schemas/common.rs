// Release-host payloads. These mirror the subset of the GitHub REST API release
// object that the installer reads; every other field of the response is ignored.
use serde::Deserialize;

/// A downloadable file attached to a release.
///
/// The installer treats this as opaque metadata: the name is scored against the
/// platform target and the URL is fetched verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    /// The filename of the asset as it appears on the release page.
    ///
    /// # Example
    /// ```text
    /// "mtest-v1.4.0-linux-amd64.tar.gz"
    /// "mtest_1.4.0_Windows_x86_64.zip"
    /// ```
    pub(crate) name: String,

    /// Direct download URL for the asset.
    pub(crate) browser_download_url: String,
}

/// A release as returned by `GET /repos/{owner}/{repo}/releases/latest` or
/// `GET /repos/{owner}/{repo}/releases/tags/{tag}`.
///
/// Both fields are optional on the wire: a draft or malformed payload without a
/// `tag_name` is treated as "no release" rather than a decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub(crate) tag_name: Option<String>,

    /// May be empty when the release has no uploaded artifacts.
    #[serde(default)]
    pub(crate) assets: Vec<ReleaseAsset>,
}
