// Prints the installer version and the platform target it resolves for this host.

use crate::libs::config::InstallConfig;
use crate::libs::utilities::platform::resolve_target;
use colored::Colorize;

pub fn run(config: &InstallConfig) -> anyhow::Result<()> {
    println!("{}", describe(config));
    Ok(())
}

fn describe(config: &InstallConfig) -> String {
    let target = match resolve_target(&config.host_os, &config.host_arch, &config.component) {
        Ok(target) => target.to_string(),
        Err(err) => err.to_string().red().to_string(),
    };
    format!(
        "{} {}\ntarget: {}",
        env!("CARGO_PKG_NAME").bold(),
        env!("CARGO_PKG_VERSION"),
        target
    )
}
