use crate::installer::{RegistryBuilder, ServiceRegistry, SqlScriptUpdater, Updater, UpdaterIndexes};
use anyhow::{anyhow, Result};
use config::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A directory of SQL update scripts registered as one updater
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdaterSource {
    /// Updater identifier, the key in the version store
    pub name: String,

    /// Directory holding `install.sql` and `update<N>.sql`
    pub path: String,

    /// Higher priorities are visited first
    #[serde(default)]
    pub priority: i32,
}

pub struct GoatConfig {
    /// Path to the SQLite database holding the application schema
    pub database_path: String,

    /// Enable debug logging
    pub debug: bool,

    /// Script directories registered as updaters
    pub updaters: Vec<UpdaterSource>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    database_path: Option<String>,
    debug: Option<bool>,
    #[serde(default, rename = "updater")]
    updaters: Vec<UpdaterSource>,
}

const EMPTY_CONFIG: &str = r#"### goat-updater configuration file

### SQLite database holding the application schema
# database_path = "~/.goat/goat.sqlite3"

### enable debug logging
# debug = false

### one table per updater: a directory of install.sql / update<N>.sql scripts
# [[updater]]
# name = "blog::Schema"
# path = "/srv/blog/sql"
# priority = 10
"#;

fn home_dir() -> Result<String> {
    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not find home directory"))?
        .to_str()
        .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
        .to_owned())
}

impl Default for GoatConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());

        Self {
            database_path: format!("{}/.goat/goat.sqlite3", home_dir),
            debug: false,
            updaters: vec![],
        }
    }
}

impl GoatConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<GoatConfig> {
        let mut builder = Config::builder();

        // By default use $HOME/.goat/goat.toml as the configuration file path
        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(
                        config::File::with_name(path_str).format(config::FileFormat::Toml),
                    );
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                let goat_dir = format!("{}/.goat", home_dir()?);
                std::fs::create_dir_all(goat_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create goat directory: {}", e))?;
                let p = format!("{}/goat.toml", goat_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // Add in settings from the environment (with a prefix of GOAT)
        // E.g., `GOAT_DATABASE_PATH=/tmp/app.sqlite3 ./goat-updater status`
        builder = builder.add_source(config::Environment::with_prefix("GOAT").try_parsing(true));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let raw = settings
            .try_deserialize::<RawConfig>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<GoatConfig> {
        let defaults = GoatConfig::default();

        let database_path = match raw.database_path {
            Some(p) => expand_home(&p)?,
            None => defaults.database_path,
        };

        let updaters = raw
            .updaters
            .into_iter()
            .map(|source| {
                Ok(UpdaterSource {
                    path: expand_home(&source.path)?,
                    ..source
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GoatConfig {
            database_path,
            debug: raw.debug.unwrap_or(defaults.debug),
            updaters,
        })
    }

    /// Register every configured script directory as an updater
    pub fn registry(&self) -> Result<(ServiceRegistry, UpdaterIndexes)> {
        let mut builder = RegistryBuilder::new();
        for source in &self.updaters {
            let definition = SqlScriptUpdater::load(&source.name, &source.path)?;
            let service_id = format!("updater.{}", source.name);
            builder
                .updater_with_priority(&service_id, Updater::new(definition), source.priority)
                .map_err(|e| anyhow!("Invalid updater configuration: {}", e))?;
        }
        Ok(builder.build())
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Config File:        {}", Self::config_file_path()),
            format!("Database Path:      {}", self.database_path),
            format!("Debug:              {}", self.debug),
        ];

        if self.updaters.is_empty() {
            lines.push("Updaters:           (none)".to_string());
        } else {
            lines.push("Updaters:".to_string());
            for source in &self.updaters {
                lines.push(format!(
                    "  {} (priority {}): {}",
                    source.name, source.priority, source.path
                ));
            }
        }

        lines.join("\n")
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.goat/goat.toml", home_dir)
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> Result<String> {
    match path.strip_prefix("~/") {
        Some(rest) => Ok(format!("{}/{}", home_dir()?, rest)),
        None => Ok(path.to_string()),
    }
}
