use anyhow::Result;
use goat_updater::{InstallManager, OutputFormat};

pub fn run(manager: &InstallManager, output_format: OutputFormat) -> Result<()> {
    let report = manager.get_current_status()?;

    if let Some(json) = output_format.to_json(&report) {
        println!("{}", json?);
        return Ok(());
    }

    if report.is_empty() {
        println!("No updater is registered.");
        return Ok(());
    }

    if let Some(table) = output_format.to_table(report.rows()) {
        println!("{}", table);
    }
    Ok(())
}
