// Candidate artifacts: one named (or URLed) file the installer is willing to try.

use crate::libs::errors::InstallError;
use std::fmt;
use std::str::FromStr;

/// How a downloaded artifact turns into an executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpackStrategy {
    /// gzip-compressed tarball (`.tar.gz`, `.tgz`).
    ArchiveTar,
    /// zip archive.
    ArchiveZip,
    /// The artifact is the executable itself.
    RawBinary,
}

impl UnpackStrategy {
    /// Infers the strategy from an asset name. Only the suffix matters.
    pub fn infer(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".zip") {
            UnpackStrategy::ArchiveZip
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            UnpackStrategy::ArchiveTar
        } else {
            // `.exe`, the bare binary name, and anything unrecognised.
            UnpackStrategy::RawBinary
        }
    }
}

impl FromStr for UnpackStrategy {
    type Err = InstallError;

    /// Parses the textual strategy accepted by `--unpack` / `MTEST_DIST_UNPACK`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "tar" | "tar.gz" | "tgz" => Ok(UnpackStrategy::ArchiveTar),
            "zip" => Ok(UnpackStrategy::ArchiveZip),
            "binary" | "raw" => Ok(UnpackStrategy::RawBinary),
            other => Err(InstallError::UnsupportedUnpackStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for UnpackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UnpackStrategy::ArchiveTar => "tar",
            UnpackStrategy::ArchiveZip => "zip",
            UnpackStrategy::RawBinary => "binary",
        };
        f.write_str(label)
    }
}

/// One entry of the ordered candidate sequence.
///
/// `url` is set for assets reported by the release host; heuristic candidates only
/// carry a `name`, resolved against the download root at attempt time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCandidate {
    pub name: String,
    pub unpack: UnpackStrategy,
    pub url: Option<String>,
}

impl AssetCandidate {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let unpack = UnpackStrategy::infer(without_query(&name));
        AssetCandidate {
            name,
            unpack,
            url: None,
        }
    }

    pub fn with_url(name: impl Into<String>, url: impl Into<String>) -> Self {
        AssetCandidate {
            url: Some(url.into()),
            ..AssetCandidate::named(name)
        }
    }

    /// Deduplication key: the URL when known, otherwise the name.
    pub fn key(&self) -> &str {
        self.url.as_deref().unwrap_or(&self.name)
    }

    /// The last path segment of the name, used as the on-disk filename of the download.
    /// Query strings and fragments (`?id=42`, `#sha256=...`) are not part of it.
    pub fn file_name(&self) -> &str {
        let path = without_query(&self.name);
        path.rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
    }
}

/// On-disk name for a download whose name has no usable path segment.
const DEFAULT_FILE_NAME: &str = "artifact";

/// `name` up to its first `?` or `#`.
fn without_query(name: &str) -> &str {
    name.split(['?', '#']).next().unwrap_or(name)
}
