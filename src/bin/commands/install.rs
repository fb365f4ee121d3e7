use anyhow::Result;
use clap::Args;
use goat_updater::InstallManager;

/// Arguments for the Install command
#[derive(Args)]
pub struct InstallArgs {
    /// Updater identifier, e.g. blog::Schema
    pub updater: String,
}

pub fn run(manager: &InstallManager, args: InstallArgs) -> Result<()> {
    let InstallArgs { updater } = args;

    manager.install(&updater)?;
    println!("{}: installed", updater);
    Ok(())
}
