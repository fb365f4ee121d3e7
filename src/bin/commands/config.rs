use anyhow::Result;
use goat_updater::{GoatConfig, OutputFormat, UpdaterSource};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ConfigInfo<'a> {
    config_file: String,
    database_path: &'a str,
    database_exists: bool,
    debug: bool,
    updaters: &'a [UpdaterSource],
}

pub fn run(config: &GoatConfig, output_format: OutputFormat) -> Result<()> {
    let info = ConfigInfo {
        config_file: GoatConfig::config_file_path(),
        database_path: &config.database_path,
        database_exists: Path::new(&config.database_path).exists(),
        debug: config.debug,
        updaters: &config.updaters,
    };

    match output_format.to_json(&info) {
        Some(json) => println!("{}", json?),
        None => println!("{}", config.summary()),
    }
    Ok(())
}
