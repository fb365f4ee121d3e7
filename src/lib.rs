#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! goat-updater - versioned schema installs and updates
//!
//! goat-updater keeps track of which version of each application schema is
//! installed in a database and runs the missing updates, each in its own
//! transaction. It can be used as both a command-line application and a
//! library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Install engine and SQLite runner | `rusqlite` |
//! | `display` | Table formatting of reports with `tabled` | `tabled` |
//! | `cli` | CLI binary | All above + `clap`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`database`]**: the runner contract, SQLite runner and `goat_schema`
//!   version store
//! - **[`installer`]**: updaters, the service registry and the install manager
//! - **[`config`]**: configuration management
//! - **[`error`]**: error types
//! - **[`output`]**: table and JSON rendering of reports
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use goat_updater::{DatabaseConn, InstallManager, RegistryBuilder, Updater};
//! use goat_updater::installer::{UpdateRegistrar, UpdaterDefinition};
//!
//! struct BlogSchema;
//!
//! impl UpdaterDefinition for BlogSchema {
//!     fn name(&self) -> &str {
//!         "blog::Schema"
//!     }
//!
//!     fn register_updates(&self, updates: &mut UpdateRegistrar) {
//!         updates.add(1, Some("Add the post table"), |runner, _| {
//!             runner.execute("create table post (id integer primary key)", &[])?;
//!             Ok(())
//!         });
//!     }
//! }
//!
//! let db = DatabaseConn::open_path("app.sqlite3")?;
//! let mut builder = RegistryBuilder::new();
//! builder.updater("blog.schema", Updater::new(BlogSchema))?;
//! let (registry, indexes) = builder.build();
//!
//! let manager = InstallManager::new(&db, &registry, indexes);
//! manager.install("blog::Schema")?;
//! manager.run_single_update("blog::Schema", 1, true)?;
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod installer;
pub mod output;

pub use config::{GoatConfig, UpdaterSource};

pub use database::{DatabaseConn, IsolationLevel, Runner, Transaction, VersionStore, UNINSTALLED};

pub use error::{DatabaseError, InstallError, InstallResult, RegistryError};

pub use installer::{
    InstallManager, PendingUpdates, RegistryBuilder, SelfUpdater, ServiceRegistry,
    SqlScriptUpdater, StatusReport, Updater, UpdaterDefinition, UpdaterIndexes,
};

pub use output::OutputFormat;
