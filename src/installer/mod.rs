//! Schema install and update engine
//!
//! ```text
//! installer/
//! ├── updater        # Updater, UpdaterDefinition, update discovery
//! ├── self_updater   # updater owning the goat_schema table
//! ├── sql_updater    # updater reading update<N>.sql scripts from a directory
//! ├── registry       # service registry and updater indexes
//! ├── report         # pending-update and status reports
//! └── manager        # InstallManager
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use goat_updater::database::DatabaseConn;
//! use goat_updater::installer::{InstallManager, RegistryBuilder, SqlScriptUpdater, Updater};
//!
//! let db = DatabaseConn::open_path("app.sqlite3")?;
//!
//! let mut builder = RegistryBuilder::new();
//! builder.updater("blog.schema", Updater::new(SqlScriptUpdater::load("blog::Schema", "sql/blog")?))?;
//! let (registry, indexes) = builder.build();
//!
//! let manager = InstallManager::new(&db, &registry, indexes);
//! for (name, updates) in manager.get_pending_updates()?.iter() {
//!     println!("{}: {} pending", name, updates.len());
//! }
//! manager.install("blog::Schema")?;
//! manager.run_single_update("blog::Schema", 1, true)?;
//! ```

mod manager;
mod registry;
mod report;
mod self_updater;
mod sql_updater;
mod updater;

pub use manager::{InstallManager, SchemaState};
pub use registry::{RegistryBuilder, ServiceRegistry, UpdaterIndexes};
pub use report::{
    PendingRow, PendingUpdates, StatusReport, StatusRow, UpdaterState, UpdaterStatus, INSTALLATION,
};
pub use self_updater::{SelfUpdater, SELF_UPDATER_NAME};
pub use sql_updater::SqlScriptUpdater;
pub use updater::{
    normalize_description, parse_update_version, Update, UpdateProcedure, UpdateRegistrar, Updater,
    UpdaterDefinition, UNDOCUMENTED_UPDATE, UPDATE_METHOD_PREFIX,
};
