mod cli;
mod commands;
mod installers;
mod libs;
mod logger;
mod schemas;

use clap::Parser;
use cli::cmd_enums::{Cli, Commands};
use colored::Colorize;
use commands::{check, install, plan, version};
use libs::config::InstallConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = InstallConfig::from_env(cli.install)?;
    log_debug!(
        "Host {}/{}, repository {:?}, install dir {}",
        config.host_os,
        config.host_arch,
        config.repository,
        config.install_dir.display()
    );

    match cli.command.unwrap_or(Commands::Install) {
        Commands::Install => install::run(&config),
        Commands::Plan => plan::run(&config),
        Commands::Check => check::run(&config),
        Commands::Version => version::run(&config),
    }
}
