// Filesystem locations used by the installer.
use crate::log_debug;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Default runtime directory: `<local data dir>/<component>/runtime`
/// (e.g. `~/.local/share/mtest/runtime` on Linux).
///
/// `None` when the platform has no notion of a local data directory, e.g. `$HOME` is unset.
pub fn default_runtime_dir(component: &str) -> Option<PathBuf> {
    let dir = dirs::data_local_dir()?.join(component).join("runtime");
    log_debug!("Default runtime directory: {}", dir.display().to_string().yellow());
    Some(dir)
}

/// Where the installed executable lives.
pub fn installed_binary_path(install_dir: &Path, binary_name: &str) -> PathBuf {
    install_dir.join(binary_name)
}

/// Parent directory for per-attempt work directories.
pub fn temp_root(configured: Option<&Path>) -> PathBuf {
    configured
        .map(Path::to_path_buf)
        .unwrap_or_else(std::env::temp_dir)
}
