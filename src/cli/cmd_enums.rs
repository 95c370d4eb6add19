use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface of `mtest-install`.
///
/// Package managers run this from a post-install hook without arguments, so every option
/// can also be supplied through an environment variable, and the subcommand defaults to `install`.
#[derive(Parser)]
#[command(name = "mtest-install")]
#[command(about = "Download and install the prebuilt mtest binary for this platform", long_about = None)]
pub struct Cli {
    /// Enables debug output.
    // Environment values are read leniently: `1`/`yes`/`on` enable, empty/`0`/`false`/`off` do not.
    #[arg(short, long, global = true, env = "MTEST_DEBUG", value_parser = FalseyValueParser::new())]
    pub(crate) debug: bool,

    #[command(flatten)]
    pub(crate) install: InstallArgs,

    /// What to do. Defaults to `install`.
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Resolve, download and install the runtime binary (default).
    Install,
    /// Show the candidate artifacts that `install` would try, without downloading anything.
    Plan,
    /// Verify that the runtime binary is installed and executable.
    Check,
    /// Print the installer version and the detected platform target.
    Version,
}

/// Options shared by every subcommand. Each one falls back to an environment variable.
#[derive(Args, Debug, Default, Clone)]
pub struct InstallArgs {
    /// Skip the download entirely and exit successfully.
    #[arg(long, global = true, env = "MTEST_SKIP_BINARY_INSTALL", value_parser = FalseyValueParser::new())]
    pub(crate) skip: bool,

    /// Release-host repository as `owner/name`.
    #[arg(long, global = true, env = "MTEST_DIST_REPO")]
    pub(crate) repo: Option<String>,

    /// Install this release instead of the latest one (`1.4.0` and `v1.4.0` are equivalent).
    /// Also read from MTEST_DIST_TAG and npm_config_mtest_version.
    #[arg(long, global = true, env = "MTEST_DIST_VERSION")]
    pub(crate) version_tag: Option<String>,

    /// Download root used instead of the release host; `{tag}` and `{version}` are substituted.
    #[arg(long, global = true, env = "MTEST_DIST_BASE_URL")]
    pub(crate) base_url: Option<String>,

    /// Exact asset name or URL to download; `{tag}` and `{version}` are substituted.
    #[arg(long, global = true, env = "MTEST_DIST_ASSET")]
    pub(crate) asset: Option<String>,

    /// Replaces the `mtest-{tag}-<os>-<arch>` asset name prefix.
    #[arg(long, global = true, env = "MTEST_DIST_ASSET_PREFIX")]
    pub(crate) asset_prefix: Option<String>,

    /// How to unpack the explicit asset: tar, zip or binary. Inferred from its name by default.
    #[arg(long, global = true, env = "MTEST_DIST_UNPACK")]
    pub(crate) unpack: Option<String>,

    /// Bearer token for the release API. Also read from GITHUB_TOKEN.
    #[arg(long, global = true, env = "MTEST_DIST_GITHUB_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,

    /// Release API root.
    #[arg(long, global = true, env = "MTEST_DIST_API_URL")]
    pub(crate) api_url: Option<String>,

    /// Directory the runtime binary is installed into.
    #[arg(long, global = true, env = "MTEST_INSTALL_DIR")]
    pub(crate) install_dir: Option<PathBuf>,

    /// Where per-attempt temporary directories are created.
    #[arg(long, global = true, env = "MTEST_TMP_DIR")]
    pub(crate) tmp_dir: Option<PathBuf>,

    /// Override the detected operating system (`linux`, `macos`, `windows`).
    #[arg(long, global = true, env = "MTEST_DIST_OS")]
    pub(crate) os: Option<String>,

    /// Override the detected CPU architecture (`x86_64`, `aarch64`, `x86`).
    #[arg(long, global = true, env = "MTEST_DIST_ARCH")]
    pub(crate) arch: Option<String>,

    /// Version used when the release host cannot be asked. Defaults to this installer's version;
    /// pass an empty string to disable the fallback.
    #[arg(long, global = true, env = "MTEST_FALLBACK_VERSION")]
    pub(crate) fallback_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["mtest-install", "--version-tag", "1.2.3"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.install.version_tag.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["mtest-install", "plan", "--os", "windows", "--arch", "x86"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Plan));
        assert_eq!(cli.install.os.as_deref(), Some("windows"));
        assert_eq!(cli.install.arch.as_deref(), Some("x86"));
    }

    #[test]
    fn boolean_environment_values_are_lenient() {
        let parse = |skip: &str, debug: &str| {
            // SAFETY: no other test sets these variables, and the parse below is the only reader
            // that depends on their value.
            unsafe {
                std::env::set_var("MTEST_SKIP_BINARY_INSTALL", skip);
                std::env::set_var("MTEST_DEBUG", debug);
            }
            let parsed = Cli::try_parse_from(["mtest-install"]);
            unsafe {
                std::env::remove_var("MTEST_SKIP_BINARY_INSTALL");
                std::env::remove_var("MTEST_DEBUG");
            }
            let cli = parsed.unwrap_or_else(|err| panic!("skip={skip:?} debug={debug:?}: {err}"));
            (cli.install.skip, cli.debug)
        };

        assert_eq!(parse("1", "1"), (true, true));
        assert_eq!(parse("yes", "on"), (true, true));
        assert_eq!(parse("true", "TRUE"), (true, true));
        assert_eq!(parse("", ""), (false, false));
        assert_eq!(parse("0", "false"), (false, false));
        assert_eq!(parse("no", "off"), (false, false));
    }
}
