//! Core database infrastructure
//!
//! This module provides the foundational database components used by the installer:
//! - `Runner` / `Transaction`: the contract the install engine executes against
//! - `DatabaseConn`: SQLite connection wrapper implementing `Runner`
//! - `SqliteTransaction`: explicit transaction handle over a SQLite connection
//! - `VersionStore`: reads and writes of the `goat_schema` version table

mod connection;
mod runner;
mod schema;
mod transaction;

pub use connection::DatabaseConn;
pub use runner::{scalar_as_i64, IsolationLevel, Runner, Transaction};
pub use schema::{SchemaDefinitions, VersionStore, UNINSTALLED, VERSION_STORE_TABLE};
pub use transaction::SqliteTransaction;
