use anyhow::{anyhow, Result};
use clap::Args;
use goat_updater::InstallManager;

/// Arguments for the RunSingle command
#[derive(Args)]
pub struct RunSingleArgs {
    /// Updater identifier, e.g. blog::Schema
    pub updater: String,

    /// Update version to run
    pub version: String,
}

/// Run one update; the version store is left untouched so it can be replayed
pub fn run(manager: &InstallManager, args: RunSingleArgs) -> Result<()> {
    let RunSingleArgs { updater, version } = args;

    let version = parse_version(&version)?;
    manager.run_single_update(&updater, version, false)?;
    println!("{}: ran update {} (version not saved)", updater, version);
    Ok(())
}

fn parse_version(version: &str) -> Result<u32> {
    if version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
        return Err(anyhow!(
            "update version must be a non-negative integer, got '{}'",
            version
        ));
    }
    version
        .parse()
        .map_err(|e| anyhow!("invalid update version '{}': {}", version, e))
}
