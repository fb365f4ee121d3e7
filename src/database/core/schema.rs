//! Version store schema and access
//!
//! The version store is the `goat_schema` table: one row per updater holding
//! the last applied version. A missing row means the updater was never
//! installed, exactly like a row holding [`UNINSTALLED`].

use crate::database::core::runner::{scalar_as_i64, Runner};
use crate::error::DatabaseError;
use rusqlite::params;

/// Sentinel version for an updater that was never installed
pub const UNINSTALLED: i64 = -1;

/// Name of the version store table
pub const VERSION_STORE_TABLE: &str = "goat_schema";

/// Schema definitions for the engine's own bookkeeping
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// SQL for creating the version store table
    ///
    /// No `IF NOT EXISTS`: an existing table surfaces as a driver error,
    /// which the self updater tolerates.
    pub const VERSION_STORE: &'static str = "create table goat_schema(name varchar(255) unique not null, version integer not null default -1)";

    /// Trivial read used to probe for the version store
    pub const PROBE: &'static str = "select 1 from goat_schema";

    pub const SELECT_VERSION: &'static str = "select version from goat_schema where name = ?1";

    pub const INSERT_VERSION: &'static str = "insert into goat_schema (name, version) values (?1, ?2)";

    pub const UPDATE_VERSION: &'static str = "update goat_schema set version = ?2 where name = ?1";
}

/// Reads and writes version store rows through a runner
pub struct VersionStore<'a> {
    runner: &'a dyn Runner,
}

impl<'a> VersionStore<'a> {
    pub fn new(runner: &'a dyn Runner) -> Self {
        Self { runner }
    }

    /// Issue a trivial read; fails when the table does not exist
    pub fn probe(&self) -> Result<(), DatabaseError> {
        self.runner.query_rows(SchemaDefinitions::PROBE, &[])?;
        Ok(())
    }

    /// Create the version store table
    pub fn create(&self) -> Result<(), DatabaseError> {
        self.runner.execute(SchemaDefinitions::VERSION_STORE, &[])?;
        Ok(())
    }

    /// Recorded version for an updater, [`UNINSTALLED`] when there is no row
    pub fn current_version(&self, name: &str) -> Result<i64, DatabaseError> {
        let value = self
            .runner
            .query_scalar(SchemaDefinitions::SELECT_VERSION, params![name])?;
        Ok(scalar_as_i64(value)?.unwrap_or(UNINSTALLED))
    }

    /// Whether a row exists for the updater
    pub fn has_row(&self, name: &str) -> Result<bool, DatabaseError> {
        let value = self
            .runner
            .query_scalar(SchemaDefinitions::SELECT_VERSION, params![name])?;
        Ok(value.is_some())
    }

    /// Record a version for an updater
    ///
    /// Select first, then insert or update. Callers run this inside the
    /// transaction that applied the change; there is no protection against
    /// another process writing the same row concurrently.
    pub fn record_version(&self, name: &str, version: i64) -> Result<(), DatabaseError> {
        if self.has_row(name)? {
            self.runner
                .execute(SchemaDefinitions::UPDATE_VERSION, params![name, version])?;
        } else {
            self.runner
                .execute(SchemaDefinitions::INSERT_VERSION, params![name, version])?;
        }
        Ok(())
    }
}
