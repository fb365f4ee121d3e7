//! Self updater
//!
//! The updater owning the `goat_schema` version store. The install manager
//! installs it before reading any other updater's version.

use crate::database::{Runner, Transaction, VersionStore};
use crate::installer::updater::{UpdateRegistrar, UpdaterDefinition};
use tracing::debug;

/// Identifier of the self updater in the version store
pub const SELF_UPDATER_NAME: &str = "goat::SelfUpdater";

#[derive(Debug, Default, Clone, Copy)]
pub struct SelfUpdater;

impl UpdaterDefinition for SelfUpdater {
    fn name(&self) -> &str {
        SELF_UPDATER_NAME
    }

    fn register_updates(&self, updates: &mut UpdateRegistrar) {
        updates.add_named(
            "update1",
            Some(
                "/**
                  * The very first update that will ever be run.
                  */",
            ),
            |_, _| Ok(()),
        );
        updates.add_named(
            "update2",
            Some(
                "/**
                  * Another update function with a very long description.
                  *
                  * This is valid, please note that empty lines are not kept, and text will be
                  * rendered in a very compact way.
                  *
                  * Use me as an example class to write your updates!
                  */",
            ),
            |_, _| Ok(()),
        );
    }

    fn install(&self, runner: &dyn Runner, _transaction: &dyn Transaction) -> anyhow::Result<()> {
        match VersionStore::new(runner).create() {
            Ok(()) => Ok(()),
            // The manager may already have needed the table to compare versions
            Err(e) if e.is_already_exists() => {
                debug!("version store already exists");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
