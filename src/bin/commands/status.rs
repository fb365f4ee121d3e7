use anyhow::Result;
use goat_updater::{InstallManager, OutputFormat};

pub fn run(manager: &InstallManager, output_format: OutputFormat) -> Result<()> {
    let pending = manager.get_pending_updates()?;

    if let Some(json) = output_format.to_json(&pending) {
        println!("{}", json?);
        return Ok(());
    }

    if pending.is_empty() {
        println!("Everything is up to date.");
        return Ok(());
    }

    if let Some(table) = output_format.to_table(pending.rows()) {
        println!("{}", table);
    }
    Ok(())
}
