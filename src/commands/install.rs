// The default action: put the runtime binary in place, or explain why it could not be done.

use crate::installers::prebuilt;
use crate::libs::config::InstallConfig;
use crate::{log_info, log_warn};
use anyhow::Context;
use colored::Colorize;

/// Runs the installation unless it was switched off.
pub fn run(config: &InstallConfig) -> anyhow::Result<()> {
    if config.skip_install {
        log_info!("Skipping binary download (MTEST_SKIP_BINARY_INSTALL is set).");
        return Ok(());
    }

    match prebuilt::install(config) {
        Ok(outcome) => {
            log_info!(
                "Binary ready: {} (release {}, {} after {} attempt(s))",
                outcome.binary_path.to_string_lossy().green().bold(),
                outcome.tag.cyan(),
                outcome.candidate,
                outcome.attempts
            );
            Ok(())
        }
        Err(err) => {
            // Local problems (disk, permissions) are not helped by building from source.
            if err.is_fatal() {
                log_warn!(
                    "If you have Go installed you can build from source with {}",
                    "`go install ./cmd/mtest`".bold()
                );
            }
            Err(err).context("unable to download a matching mtest binary for this platform")
        }
    }
}
