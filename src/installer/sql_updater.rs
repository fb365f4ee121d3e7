//! Updaters backed by a directory of SQL scripts
//!
//! ```text
//! blog/
//! ├── install.sql     # optional, run by the install hook
//! ├── update1.sql     # version 1
//! └── update3.sql     # version 3
//! ```
//!
//! The leading `--` comment block of an update script is its description.
//! Files not following the `update<digits>.sql` convention are ignored.

use crate::database::{Runner, Transaction};
use crate::installer::updater::{parse_update_version, UpdateRegistrar, UpdaterDefinition};
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

const SQL_EXTENSION: &str = "sql";
const INSTALL_SCRIPT: &str = "install.sql";

#[derive(Debug, Clone)]
struct UpdateScript {
    method: String,
    description: Option<String>,
    sql: Rc<str>,
}

/// An updater whose procedures are SQL scripts read from a directory
#[derive(Debug, Clone)]
pub struct SqlScriptUpdater {
    name: String,
    dir: PathBuf,
    install_sql: Option<String>,
    scripts: Vec<UpdateScript>,
}

impl SqlScriptUpdater {
    /// Read every script of `dir` up front
    pub fn load(name: &str, dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir)
            .map_err(|e| anyhow!("Failed to read script directory '{}': {}", dir.display(), e))?;

        let mut install_sql = None;
        let mut scripts = Vec::new();

        for entry in entries {
            let path = entry
                .map_err(|e| anyhow!("Failed to read script directory '{}': {}", dir.display(), e))?
                .path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if file_name == INSTALL_SCRIPT {
                install_sql = Some(read_script(&path)?);
                continue;
            }

            let Some(method) = file_name
                .strip_suffix(SQL_EXTENSION)
                .and_then(|stem| stem.strip_suffix('.'))
            else {
                continue;
            };
            if parse_update_version(method).is_none() {
                debug!("skipping '{}': not an update script", path.display());
                continue;
            }

            let sql = read_script(&path)?;
            scripts.push(UpdateScript {
                method: method.to_string(),
                description: leading_comment(&sql),
                sql: Rc::from(sql),
            });
        }

        // read_dir order is platform dependent
        scripts.sort_by(|a, b| a.method.cmp(&b.method));

        debug!(
            "loaded {} update script(s) for '{}' from '{}'",
            scripts.len(),
            name,
            dir.display()
        );

        Ok(Self {
            name: name.to_string(),
            dir: dir.to_path_buf(),
            install_sql,
            scripts,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn has_install_script(&self) -> bool {
        self.install_sql.is_some()
    }
}

fn read_script(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read script '{}': {}", path.display(), e))
}

/// Text of the `--` comment lines a script starts with, markers removed
fn leading_comment(sql: &str) -> Option<String> {
    let lines: Vec<&str> = sql
        .lines()
        .map(str::trim)
        .take_while(|line| line.is_empty() || line.starts_with("--"))
        .map(|line| line.trim_start_matches('-').trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

impl UpdaterDefinition for SqlScriptUpdater {
    fn name(&self) -> &str {
        &self.name
    }

    fn register_updates(&self, updates: &mut UpdateRegistrar) {
        for script in &self.scripts {
            let sql = Rc::clone(&script.sql);
            updates.add_named(&script.method, script.description.as_deref(), move |runner, _| {
                runner.execute_batch(&sql)?;
                Ok(())
            });
        }
    }

    fn install(&self, runner: &dyn Runner, _transaction: &dyn Transaction) -> Result<()> {
        if let Some(sql) = &self.install_sql {
            runner.execute_batch(sql)?;
        }
        Ok(())
    }
}
