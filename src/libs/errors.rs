// Error taxonomy for the installer.
//
// Fatal errors stop the run before (or after) the candidate loop. Per-candidate errors are
// caught by the orchestrator, logged, and the next candidate is attempted. Release-metadata
// errors never leave the release resolver.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    /// The host operating system has no entry in the platform matrix.
    #[error("unsupported platform: {os}")]
    UnsupportedPlatform { os: String },

    /// The host operating system is known, but not with this CPU architecture.
    #[error("unsupported architecture: {os}/{arch}")]
    UnsupportedArchitecture { os: String, arch: String },

    #[error(
        "unable to determine a release tag; set MTEST_DIST_VERSION or MTEST_DIST_BASE_URL"
    )]
    NoReleaseTagResolvable,

    #[error("request for {url} failed with HTTP status {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("failed to extract {}: {reason}", archive.display())]
    ExtractionFailed { archive: PathBuf, reason: String },

    #[error("binary '{expected}' not found inside archive")]
    BinaryNotFoundInArchive { expected: String },

    #[error("unknown unpack strategy '{0}' (expected tar, zip or binary)")]
    UnsupportedUnpackStrategy(String),

    /// Every candidate was attempted and none produced an installed binary.
    #[error(
        "unable to download a matching binary after {attempts} candidate(s){}",
        last.as_ref().map(|err| format!("; last error: {err}")).unwrap_or_default()
    )]
    CandidatesExhausted {
        attempts: usize,
        last: Option<Box<InstallError>>,
    },

    #[error("release API request {url} returned HTTP status {status}")]
    ReleaseApi { url: String, status: u16 },

    #[error("could not decode release API response from {url}: {reason}")]
    ReleaseDecode { url: String, reason: String },

    /// DNS, TLS, connection resets and friends.
    #[error("network error for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl InstallError {
    /// Wraps an `io::Error` with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        InstallError::Io {
            context: context.into(),
            source,
        }
    }

    /// Converts a `ureq` failure into our taxonomy. `on_status` decides which variant an
    /// HTTP error status maps to, since a failed download and a failed API call differ.
    pub(crate) fn from_ureq(
        url: &str,
        err: ureq::Error,
        on_status: fn(String, u16) -> InstallError,
    ) -> Self {
        match err {
            ureq::Error::Status(status, _) => on_status(url.to_string(), status),
            ureq::Error::Transport(transport) => InstallError::Transport {
                url: url.to_string(),
                reason: transport.to_string(),
            },
        }
    }

    /// `true` for errors that abort the whole run rather than a single candidate.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            InstallError::UnsupportedPlatform { .. }
                | InstallError::UnsupportedArchitecture { .. }
                | InstallError::NoReleaseTagResolvable
                | InstallError::CandidatesExhausted { .. }
                | InstallError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_includes_last_error() {
        let err = InstallError::CandidatesExhausted {
            attempts: 3,
            last: Some(Box::new(InstallError::DownloadFailed {
                url: "https://example.invalid/mtest.zip".into(),
                status: 404,
            })),
        };
        let message = err.to_string();
        assert!(message.contains("3 candidate(s)"));
        assert!(message.contains("HTTP status 404"));
        assert!(err.is_fatal());
    }

    #[test]
    fn exhausted_without_attempts_has_no_trailer() {
        let err = InstallError::CandidatesExhausted {
            attempts: 0,
            last: None,
        };
        assert_eq!(
            err.to_string(),
            "unable to download a matching binary after 0 candidate(s)"
        );
    }

    #[test]
    fn per_candidate_errors_are_recoverable() {
        let err = InstallError::BinaryNotFoundInArchive {
            expected: "mtest".into(),
        };
        assert!(!err.is_fatal());
        assert!(!InstallError::UnsupportedUnpackStrategy("rar".into()).is_fatal());
    }
}
