// Self-check of an existing installation.

use crate::libs::config::InstallConfig;
use crate::libs::paths::installed_binary_path;
use crate::libs::utilities::binary::is_executable;
use crate::libs::utilities::platform::resolve_target;
use crate::log_info;
use anyhow::{Context, bail};
use colored::Colorize;
use std::path::{Path, PathBuf};

const REINSTALL_HINT: &str = "run `mtest-install` (or reinstall the npm package) to fetch it";

/// Fails unless the runtime binary for this platform is installed and executable.
pub fn run(config: &InstallConfig) -> anyhow::Result<()> {
    let target = resolve_target(&config.host_os, &config.host_arch, &config.component)
        .context("cannot determine which binary to check")?;

    let binary = verify_installation(&config.install_dir, &target.binary_name)?;
    log_info!("Runtime binary OK: {}", binary.to_string_lossy().green());
    Ok(())
}

fn verify_installation(install_dir: &Path, binary_name: &str) -> anyhow::Result<PathBuf> {
    if !install_dir.is_dir() {
        bail!(
            "runtime directory {} is missing; {}",
            install_dir.display(),
            REINSTALL_HINT
        );
    }

    let binary = installed_binary_path(install_dir, binary_name);
    if !binary.is_file() {
        bail!("missing compiled binary at {}; {}", binary.display(), REINSTALL_HINT);
    }

    if !is_executable(&binary) {
        bail!(
            "{} is not executable; {}",
            binary.display(),
            REINSTALL_HINT
        );
    }

    Ok(binary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::utilities::binary::make_executable;
    use std::fs;

    #[test]
    fn missing_directory() {
        let root = tempfile::tempdir().unwrap();
        let err = verify_installation(&root.path().join("runtime"), "mtest").unwrap_err();
        assert!(err.to_string().contains("runtime directory"));
    }

    #[test]
    fn missing_binary() {
        let root = tempfile::tempdir().unwrap();
        let err = verify_installation(root.path(), "mtest").unwrap_err();
        assert!(err.to_string().starts_with("missing compiled binary"));
    }

    #[cfg(unix)]
    #[test]
    fn binary_without_execute_bit() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("mtest"), "#!/bin/sh\n").unwrap();
        let err = verify_installation(root.path(), "mtest").unwrap_err();
        assert!(err.to_string().contains("is not executable"));
    }

    #[test]
    fn installed_binary_passes() {
        let root = tempfile::tempdir().unwrap();
        let binary = root.path().join("mtest");
        fs::write(&binary, "#!/bin/sh\n").unwrap();
        make_executable(&binary).unwrap();
        assert_eq!(verify_installation(root.path(), "mtest").unwrap(), binary);
    }
}
