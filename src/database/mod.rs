//! Database module
//!
//! ```text
//! database/
//! └── core/            # Foundation
//!     ├── runner       # Runner and Transaction traits, isolation levels
//!     ├── connection   # SQLite DatabaseConn wrapper (a Runner)
//!     ├── transaction  # SQLite transaction handle
//!     └── schema       # goat_schema version store
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use goat_updater::database::{DatabaseConn, VersionStore};
//!
//! let db = DatabaseConn::open_path("/var/lib/app/app.sqlite3")?;
//! let store = VersionStore::new(&db);
//! let version = store.current_version("app::Schema")?;
//! ```

pub mod core;

pub use core::{
    scalar_as_i64, DatabaseConn, IsolationLevel, Runner, SchemaDefinitions, SqliteTransaction,
    Transaction, VersionStore, UNINSTALLED, VERSION_STORE_TABLE,
};

/// Ensure the directory holding a database file exists
pub fn ensure_parent_dir(db_path: &str) -> anyhow::Result<()> {
    match std::path::Path::new(db_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create database directory '{}': {}",
                    parent.display(),
                    e
                )
            }),
        _ => Ok(()),
    }
}
