use anyhow::{anyhow, Result};
use goat_updater::installer::INSTALLATION;
use goat_updater::{InstallManager, UNINSTALLED};

/// Walk the pending report in order, stopping at the first failure
pub fn run(manager: &InstallManager) -> Result<()> {
    let pending = manager.get_pending_updates()?;
    if pending.is_empty() {
        println!("Everything is up to date.");
        return Ok(());
    }

    let mut applied = 0;
    for (name, updates) in pending.iter() {
        for (version, description) in updates {
            if *version == UNINSTALLED {
                manager.install(name)?;
                println!("{}: {}", name, INSTALLATION);
            } else {
                let version = u32::try_from(*version)
                    .map_err(|_| anyhow!("{}: invalid update version {}", name, version))?;
                manager.run_single_update(name, version, true)?;
                println!("{}: update {} ({})", name, version, first_line(description));
            }
            applied += 1;
        }
    }

    println!("Applied {} change(s).", applied);
    Ok(())
}

fn first_line(description: &str) -> &str {
    description.lines().next().unwrap_or_default()
}
