// Finding the executable inside an extracted archive, and putting it in place.

// Per-candidate failures (`Io`) are reported through the installer's error type.
use crate::libs::errors::InstallError;
// Colored logging macros from `logger.rs`.
use crate::{log_debug, log_warn};
use colored::Colorize;
// Copying the binary into place and reading its metadata.
use std::fs;
// Unix only: the owner execute bit is read and set through the raw mode bits.
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
// Recursive directory walk over an extracted archive.
use walkdir::WalkDir;

/// Searches `root` depth-first for a regular file named `expected`.
///
/// Entries are visited in file-name order so the result does not depend on the filesystem's
/// directory ordering. The first exact match ends the walk.
///
/// When `allow_bare_fallback` is set and `expected` ends in `.exe`, a file named after the
/// bare stem (`mtest` for `mtest.exe`) is accepted, but only if no exact match exists anywhere
/// in the tree. Some archives built on Unix drop the suffix even for Windows targets.
///
/// # Returns
/// `None` when nothing matches; the caller decides whether that is an error.
pub fn find_binary(root: &Path, expected: &str, allow_bare_fallback: bool) -> Option<PathBuf> {
    log_debug!("[Locate] Searching {} for {}", root.to_string_lossy().yellow(), expected.bold());

    // `mtest.exe` -> `mtest`, only when the fallback is allowed at all.
    let bare = expected
        .strip_suffix(".exe")
        .filter(|_| allow_bare_fallback);
    // The first bare-name hit is remembered, an exact match later in the walk still wins.
    let mut fallback: Option<PathBuf> = None;

    // Unreadable entries are skipped rather than aborting the search.
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let name = entry.file_name().to_string_lossy();
        if name == expected {
            log_debug!("[Locate] Found {}", entry.path().display());
            return Some(entry.into_path());
        }
        if fallback.is_none() && bare.is_some_and(|bare| name == bare) {
            fallback = Some(entry.path().to_path_buf());
        }
    }

    if let Some(path) = &fallback {
        log_warn!(
            "[Locate] {} not found, using unsuffixed {}",
            expected,
            path.to_string_lossy().purple()
        );
    }
    fallback
}

/// Copies `from` to `to`, replacing whatever is at `to`, then makes it executable.
///
/// Re-running with the same arguments yields the same result.
pub fn install_binary(from: &Path, to: &Path) -> Result<(), InstallError> {
    log_debug!("[Install] Copying {} to {}", from.to_string_lossy().yellow(), to.to_string_lossy().cyan());

    // The install directory may not exist yet on a fresh machine.
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| InstallError::io(format!("creating {}", parent.display()), e))?;
    }

    // `fs::copy` truncates an existing destination. A copy instead of a rename because the
    // source lives in a temp directory that may sit on another filesystem.
    fs::copy(from, to).map_err(|e| {
        InstallError::io(format!("copying {} to {}", from.display(), to.display()), e)
    })?;

    make_executable(to)
}

/// `chmod 755` on Unix.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<(), InstallError> {
    let mut perms = fs::metadata(path)
        .map_err(|e| InstallError::io(format!("reading metadata of {}", path.display()), e))?
        .permissions();
    // rwxr-xr-x
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
        .map_err(|e| InstallError::io(format!("setting permissions on {}", path.display()), e))?;
    log_debug!("[Install] {} is now executable", path.to_string_lossy().green());
    Ok(())
}

/// Windows decides executability by extension; nothing to do.
#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<(), InstallError> {
    Ok(())
}

/// Whether `path` is a regular file the owner may execute. On non-Unix hosts any regular file counts.
pub fn is_executable(path: &Path) -> bool {
    match fs::metadata(path) {
        // Owner execute bit.
        #[cfg(unix)]
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o100 != 0,
        #[cfg(not(unix))]
        Ok(meta) => meta.is_file(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn finds_nested_exact_match() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("README.md"), "docs");
        touch(&root.path().join("mtest-v1.0.0-linux-amd64/bin/mtest"), "binary");

        let found = find_binary(root.path(), "mtest", true).unwrap();
        assert_eq!(found, root.path().join("mtest-v1.0.0-linux-amd64/bin/mtest"));
    }

    #[test]
    fn first_match_in_depth_first_order_wins() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("a/mtest"), "first");
        touch(&root.path().join("b/mtest"), "second");

        let found = find_binary(root.path(), "mtest", false).unwrap();
        assert_eq!(fs::read_to_string(found).unwrap(), "first");
    }

    #[test]
    fn directories_named_like_the_binary_are_ignored() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("mtest/LICENSE"), "MIT");

        assert!(find_binary(root.path(), "mtest", true).is_none());
    }

    #[test]
    fn bare_fallback_only_when_allowed_and_no_exact_match() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("a/mtest"), "bare");

        assert_eq!(
            find_binary(root.path(), "mtest.exe", true),
            Some(root.path().join("a/mtest"))
        );
        assert!(find_binary(root.path(), "mtest.exe", false).is_none());

        // An exact match later in the walk still beats the fallback.
        touch(&root.path().join("z/mtest.exe"), "suffixed");
        assert_eq!(
            find_binary(root.path(), "mtest.exe", true),
            Some(root.path().join("z/mtest.exe"))
        );
    }

    #[test]
    fn fallback_never_applies_in_the_other_direction() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("mtest.exe"), "suffixed");

        assert!(find_binary(root.path(), "mtest", true).is_none());
    }

    #[test]
    fn install_overwrites_and_marks_executable() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src/mtest");
        let dest = dir.path().join("runtime/mtest");
        touch(&src, "new");
        touch(&dest, "old and longer");

        install_binary(&src, &dest).unwrap();
        install_binary(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
        assert!(is_executable(&dest));
        #[cfg(unix)]
        assert_eq!(fs::metadata(&dest).unwrap().permissions().mode() & 0o777, 0o755);
    }

    #[test]
    fn missing_file_is_not_executable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_executable(&dir.path().join("nope")));
        assert!(!is_executable(dir.path()));
    }
}
