// Run configuration, captured once at startup.
//
// Command-line flags and their environment variables are read by clap. A few options have
// secondary environment variables (inherited from the npm wrapper this installer serves);
// those are resolved here through a lookup function so tests never touch the real environment.
// Components receive the finished `InstallConfig` by reference and never read the environment.

use crate::cli::cmd_enums::InstallArgs;
use crate::libs::errors::InstallError;
use crate::libs::paths;
use crate::libs::utilities::platform::host_identifiers;
use crate::schemas::candidate::UnpackStrategy;
use std::path::PathBuf;

/// The executable being distributed.
pub const COMPONENT: &str = "mtest";

pub const DEFAULT_REPOSITORY: &str = "illusionfield/mtest";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct InstallConfig {
    pub component: String,
    pub skip_install: bool,
    pub repository: Option<String>,
    pub explicit_version: Option<String>,
    pub fallback_version: Option<String>,
    pub base_url: Option<String>,
    pub asset: Option<String>,
    pub asset_prefix: Option<String>,
    pub unpack_override: Option<UnpackStrategy>,
    pub token: Option<String>,
    pub api_url: String,
    pub install_dir: PathBuf,
    pub temp_root: Option<PathBuf>,
    pub host_os: String,
    pub host_arch: String,
}

impl InstallConfig {
    /// Builds the configuration from parsed arguments and the process environment.
    pub fn from_env(args: InstallArgs) -> Result<Self, InstallError> {
        Self::from_args(args, |key| std::env::var(key).ok())
    }

    /// Builds the configuration from parsed arguments, resolving secondary variables through `lookup`.
    pub fn from_args(args: InstallArgs, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, InstallError> {
        let lookup = |key: &str| non_empty(lookup(key));
        let (host_os, host_arch) = host_identifiers();

        let explicit_version = non_empty(args.version_tag)
            .or_else(|| lookup("MTEST_DIST_TAG"))
            .or_else(|| lookup("npm_config_mtest_version"));

        let token = non_empty(args.token).or_else(|| lookup("GITHUB_TOKEN"));

        let repository = non_empty(args.repo)
            .or_else(|| infer_repository(env!("CARGO_PKG_REPOSITORY")))
            .or_else(|| Some(DEFAULT_REPOSITORY.to_string()));

        // An explicitly empty value disables the fallback; absence means "our own version".
        let fallback_version = match args.fallback_version {
            Some(value) => non_empty(Some(value)),
            None => Some(env!("CARGO_PKG_VERSION").to_string()),
        };

        let unpack_override = non_empty(args.unpack)
            .map(|value| value.parse::<UnpackStrategy>())
            .transpose()?;

        let install_dir = match args.install_dir {
            Some(dir) => dir,
            None => paths::default_runtime_dir(COMPONENT).ok_or_else(|| {
                InstallError::Config(
                    "cannot determine a default install directory; set MTEST_INSTALL_DIR".to_string(),
                )
            })?,
        };

        Ok(InstallConfig {
            component: COMPONENT.to_string(),
            skip_install: args.skip,
            repository,
            explicit_version,
            fallback_version,
            base_url: non_empty(args.base_url),
            asset: non_empty(args.asset),
            asset_prefix: non_empty(args.asset_prefix),
            unpack_override,
            token,
            api_url: non_empty(args.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            install_dir,
            temp_root: args.tmp_dir,
            host_os: non_empty(args.os).unwrap_or_else(|| host_os.to_string()),
            host_arch: non_empty(args.arch).unwrap_or_else(|| host_arch.to_string()),
        })
    }

    /// The release host is only queried when downloads are not redirected to a custom root.
    pub fn release_host_enabled(&self) -> bool {
        self.base_url.is_none() && self.repository.is_some()
    }
}

/// Treats blank strings like missing ones: an exported-but-empty variable means "unset".
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Extracts `owner/name` from a GitHub repository reference such as
/// `https://github.com/owner/name.git` or `git@github.com:owner/name`.
pub fn infer_repository(reference: &str) -> Option<String> {
    let (_, rest) = reference.split_once("github.com")?;
    let rest = rest.strip_prefix(':').or_else(|| rest.strip_prefix('/'))?;
    let slug = rest.trim_end_matches('/');
    let slug = slug.strip_suffix(".git").unwrap_or(slug);
    (!slug.is_empty()).then(|| slug.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args() -> InstallArgs {
        InstallArgs {
            install_dir: Some(PathBuf::from("/tmp/mtest-runtime")),
            ..InstallArgs::default()
        }
    }

    fn build(args: InstallArgs, env: &[(&str, &str)]) -> Result<InstallConfig, InstallError> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        InstallConfig::from_args(args, move |key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = build(args(), &[]).unwrap();
        assert_eq!(config.component, "mtest");
        assert_eq!(config.repository.as_deref(), Some("illusionfield/mtest"));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.fallback_version.as_deref(), Some(env!("CARGO_PKG_VERSION")));
        assert!(config.explicit_version.is_none());
        assert!(config.release_host_enabled());
        assert_eq!(config.host_os, std::env::consts::OS);
    }

    #[test]
    fn secondary_version_variables_in_order() {
        let config = build(
            args(),
            &[("MTEST_DIST_TAG", "v2.0.0"), ("npm_config_mtest_version", "1.0.0")],
        )
        .unwrap();
        assert_eq!(config.explicit_version.as_deref(), Some("v2.0.0"));

        let config = build(args(), &[("npm_config_mtest_version", "1.0.0")]).unwrap();
        assert_eq!(config.explicit_version.as_deref(), Some("1.0.0"));

        let primary = InstallArgs {
            version_tag: Some("3.0.0".into()),
            ..args()
        };
        let config = build(primary, &[("MTEST_DIST_TAG", "v2.0.0")]).unwrap();
        assert_eq!(config.explicit_version.as_deref(), Some("3.0.0"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let blank = InstallArgs {
            version_tag: Some("  ".into()),
            base_url: Some(String::new()),
            ..args()
        };
        let config = build(blank, &[("GITHUB_TOKEN", "")]).unwrap();
        assert!(config.explicit_version.is_none());
        assert!(config.base_url.is_none());
        assert!(config.token.is_none());
    }

    #[test]
    fn token_falls_back_to_github_token() {
        let config = build(args(), &[("GITHUB_TOKEN", "ghp_x")]).unwrap();
        assert_eq!(config.token.as_deref(), Some("ghp_x"));
    }

    #[test]
    fn base_url_disables_release_host() {
        let config = build(
            InstallArgs {
                base_url: Some("https://cdn.example/{tag}".into()),
                ..args()
            },
            &[],
        )
        .unwrap();
        assert!(!config.release_host_enabled());
    }

    #[test]
    fn empty_fallback_version_disables_it() {
        let config = build(
            InstallArgs {
                fallback_version: Some(String::new()),
                ..args()
            },
            &[],
        )
        .unwrap();
        assert!(config.fallback_version.is_none());
    }

    #[test]
    fn unknown_unpack_override_is_rejected() {
        let err = build(
            InstallArgs {
                unpack: Some("rar".into()),
                ..args()
            },
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedUnpackStrategy(_)));
    }

    #[test]
    fn repository_inference() {
        assert_eq!(
            infer_repository("https://github.com/illusionfield/mtest").as_deref(),
            Some("illusionfield/mtest")
        );
        assert_eq!(
            infer_repository("git+https://github.com/owner/name.git").as_deref(),
            Some("owner/name")
        );
        assert_eq!(infer_repository("git@github.com:owner/name.git").as_deref(), Some("owner/name"));
        assert_eq!(infer_repository("https://gitlab.com/owner/name"), None);
        assert_eq!(infer_repository("https://github.com/"), None);
    }
}
