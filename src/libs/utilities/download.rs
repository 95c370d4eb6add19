// Plain HTTP(S) download of a single URL to disk.

// HTTP status and transport failures map onto `DownloadFailed` / `Transport`.
use crate::libs::errors::InstallError;
use crate::log_debug;
use colored::Colorize;
// The destination file, created only after a successful response.
use std::fs::{self, File};
// `io::copy` streams the response body to disk without buffering it whole.
use std::io;
use std::path::Path;

/// Identifies us to the release host and download mirrors.
pub fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// The one HTTP agent of a run, shared by the release API client and the downloader.
///
/// No timeouts are configured: a stalled candidate blocks until the process is terminated.
pub fn build_agent() -> ureq::Agent {
    ureq::AgentBuilder::new().user_agent(&user_agent()).build()
}

/// Downloads `url` and writes the body verbatim to `dest`, creating parent directories.
///
/// There is no retry here; a failing URL is reported and the caller moves on to its next candidate.
///
/// # Returns
/// The number of bytes written.
///
/// # Errors
/// * `DownloadFailed` when the server answers with a non-success status.
/// * `Transport` when no response was received at all.
/// * `Io` when the destination cannot be written.
pub fn download_file(agent: &ureq::Agent, url: &str, dest: &Path) -> Result<u64, InstallError> {
    log_debug!("[Download] GET {}", url.blue());

    // ureq reports 4xx/5xx as `Err`, so a response here is always a success.
    let response = agent
        .get(url)
        .call()
        .map_err(|err| InstallError::from_ureq(url, err, |url, status| InstallError::DownloadFailed { url, status }))?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| InstallError::io(format!("creating {}", parent.display()), e))?;
    }

    // The file is only created once the server has answered successfully,
    // so a 404 never leaves an empty file behind.
    let mut file = File::create(dest)
        .map_err(|e| InstallError::io(format!("creating {}", dest.display()), e))?;
    // Stream the body straight into the file.
    let mut reader = response.into_reader();
    let written = io::copy(&mut reader, &mut file)
        .map_err(|e| InstallError::io(format!("writing {}", dest.display()), e))?;

    log_debug!("[Download] {} bytes written to {}", written, dest.to_string_lossy().green());
    Ok(written)
}
