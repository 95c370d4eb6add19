// The platform descriptor every later stage works from.

use std::fmt;

/// Which release artifact fits the host, in the release host's own vocabulary.
///
/// `os_tag` / `arch_tag` use Go's GOOS/GOARCH naming (`darwin`, `amd64`, ...) because
/// that is how the release assets are named. `binary_name` is derived from `os_tag`
/// alone: Windows targets get an `.exe` suffix, everything else uses the bare component name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTarget {
    pub os_tag: &'static str,
    pub arch_tag: &'static str,
    pub binary_name: String,
}

impl PlatformTarget {
    /// Windows is the only target whose executable carries a filename suffix.
    pub fn is_windows(&self) -> bool {
        self.os_tag == "windows"
    }

    /// The binary name without its platform suffix (`mtest.exe` -> `mtest`).
    pub fn binary_stem(&self) -> &str {
        self.binary_name
            .strip_suffix(".exe")
            .unwrap_or(&self.binary_name)
    }
}

impl fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.os_tag, self.arch_tag, self.binary_name)
    }
}
