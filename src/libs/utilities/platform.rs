// Host platform detection and the alias tables used for fuzzy asset-name matching.

use crate::libs::errors::InstallError;
use crate::log_debug;
use crate::schemas::platform::PlatformTarget;
use colored::Colorize;

/// Supported host (OS, architecture) pairs and the release-host tags they map to.
///
/// Host identifiers use Rust's `std::env::consts` spelling; the tags use Go's GOOS/GOARCH
/// spelling, which is what release artifacts are named after.
const PLATFORM_MATRIX: &[(&str, &[(&str, &str)], &str)] = &[
    ("macos", &[("aarch64", "arm64"), ("x86_64", "amd64")], "darwin"),
    ("linux", &[("aarch64", "arm64"), ("x86_64", "amd64")], "linux"),
    (
        "windows",
        &[("aarch64", "arm64"), ("x86", "386"), ("x86_64", "amd64")],
        "windows",
    ),
];

/// Maps a host OS / architecture pair to the platform target for `component`.
///
/// # Errors
/// * `UnsupportedPlatform` when `os` has no row in the matrix.
/// * `UnsupportedArchitecture` when `os` is known but `arch` is not supported on it.
pub fn resolve_target(os: &str, arch: &str, component: &str) -> Result<PlatformTarget, InstallError> {
    let os_lower = os.to_lowercase();
    let arch_lower = arch.to_lowercase();

    let (_, arches, os_tag) = *PLATFORM_MATRIX
        .iter()
        .find(|(host_os, _, _)| *host_os == os_lower)
        .ok_or_else(|| InstallError::UnsupportedPlatform { os: os.to_string() })?;

    let (_, arch_tag) = *arches
        .iter()
        .find(|(host_arch, _)| *host_arch == arch_lower)
        .ok_or_else(|| InstallError::UnsupportedArchitecture {
            os: os.to_string(),
            arch: arch.to_string(),
        })?;

    let target = PlatformTarget {
        os_tag,
        arch_tag,
        binary_name: binary_name_for(os_tag, component),
    };
    log_debug!("[Platform] {}/{} resolved to {}", os, arch, target.to_string().cyan());
    Ok(target)
}

/// The executable filename convention of an OS tag.
pub fn binary_name_for(os_tag: &str, component: &str) -> String {
    if os_tag == "windows" {
        format!("{component}.exe")
    } else {
        component.to_string()
    }
}

/// The running process's own OS and architecture.
pub fn host_identifiers() -> (&'static str, &'static str) {
    (std::env::consts::OS, std::env::consts::ARCH)
}

/// Common spellings of an OS tag found in release asset names (all lowercase).
/// Unknown tags alias only to themselves.
pub fn os_aliases(os_tag: &str) -> Vec<&str> {
    match os_tag {
        "darwin" => vec!["darwin", "macos", "mac", "osx"],
        "linux" => vec!["linux"],
        "windows" => vec!["windows", "win32", "win", "win64"],
        other => vec![other],
    }
}

/// Common spellings of an architecture tag found in release asset names (all lowercase).
pub fn arch_aliases(arch_tag: &str) -> Vec<&str> {
    match arch_tag {
        "amd64" => vec!["amd64", "x86_64", "x64"],
        "arm64" => vec!["arm64", "aarch64"],
        "386" => vec!["386", "x86", "ia32"],
        other => vec![other],
    }
}
