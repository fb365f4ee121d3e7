//! Install and update manager
//!
//! [`InstallManager`] resolves updaters from a [`ServiceRegistry`], makes sure
//! the version store exists, reports pending work and runs installs and
//! updates, each inside its own serializable transaction.
//!
//! Dependency ordering between updaters is not handled: updaters are visited
//! in the order of the updater index.

use crate::database::{IsolationLevel, Runner, Transaction, VersionStore, UNINSTALLED};
use crate::error::{InstallError, InstallResult};
use crate::installer::registry::{ServiceRegistry, UpdaterIndexes};
use crate::installer::report::{PendingUpdates, StatusReport, UpdaterStatus, INSTALLATION};
use crate::installer::self_updater::SelfUpdater;
use crate::installer::updater::Updater;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Whether the version store has been checked by this manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Uninitialized,
    SchemaVerified,
}

pub struct InstallManager<'a> {
    runner: &'a dyn Runner,
    registry: &'a ServiceRegistry,
    updater_index: Vec<String>,
    class_index: HashMap<String, String>,
    self_updater: Updater,
    schema_state: Cell<SchemaState>,
}

impl<'a> InstallManager<'a> {
    pub fn new(runner: &'a dyn Runner, registry: &'a ServiceRegistry, indexes: UpdaterIndexes) -> Self {
        Self {
            runner,
            registry,
            updater_index: indexes.updater_index,
            class_index: indexes.class_index,
            self_updater: Updater::new(SelfUpdater),
            schema_state: Cell::new(SchemaState::Uninitialized),
        }
    }

    pub fn schema_state(&self) -> SchemaState {
        self.schema_state.get()
    }

    /// Make sure the version store exists, once per manager
    ///
    /// Probes the table and installs the self updater when the probe fails.
    /// The check is not repeated afterwards, whether or not it succeeded.
    fn ensure_schema(&self) -> InstallResult<()> {
        if self.schema_state.get() == SchemaState::SchemaVerified {
            return Ok(());
        }
        self.schema_state.set(SchemaState::SchemaVerified);

        if let Err(e) = VersionStore::new(self.runner).probe() {
            info!("version store is missing ({}), installing it", e);
            self.do_run_install(&self.self_updater, false)?;
        }
        Ok(())
    }

    /// Resolve one updater by identifier
    ///
    /// Leading `\` namespace separators are ignored.
    pub fn get_updater(&self, name: &str) -> InstallResult<Rc<Updater>> {
        let name = name.trim_start_matches('\\');

        let service_id = self.class_index.get(name).ok_or_else(|| {
            InstallError::InvalidArgument(format!("updater '{}' is not registered", name))
        })?;

        self.registry
            .resolve(service_id)?
            .downcast::<Updater>()
            .map_err(|_| {
                InstallError::InvalidArgument(format!(
                    "service '{}' registered for updater '{}' is not an updater",
                    service_id, name
                ))
            })
    }

    /// Resolve every registered updater
    ///
    /// Fails as a whole as soon as one registration does not resolve to an
    /// updater.
    pub fn get_all_updaters(&self) -> InstallResult<Vec<Rc<Updater>>> {
        self.updater_index
            .iter()
            .map(|service_id| {
                self.registry
                    .resolve(service_id)?
                    .downcast::<Updater>()
                    .map_err(|_| {
                        InstallError::InvalidArgument(format!(
                            "service '{}' is not an updater",
                            service_id
                        ))
                    })
            })
            .collect()
    }

    fn read_version(&self, updater: &Updater) -> InstallResult<i64> {
        Ok(VersionStore::new(self.runner).current_version(updater.name())?)
    }

    /// Pending updates of every registered updater
    ///
    /// Updaters with nothing pending are left out. Never-installed updaters
    /// get an `Installation` entry under version `-1` ahead of their updates.
    pub fn get_pending_updates(&self) -> InstallResult<PendingUpdates> {
        let mut pending = PendingUpdates::new();
        if self.updater_index.is_empty() {
            return Ok(pending);
        }

        self.ensure_schema()?;

        for updater in self.get_all_updaters()? {
            let name = updater.name();
            let current_version = self.read_version(&updater)?;

            if current_version == UNINSTALLED {
                pending.push(name, UNINSTALLED, INSTALLATION);
            }
            for (version, description) in updater.get_missing_update_since(current_version) {
                pending.push(name, i64::from(version), description);
            }
        }

        Ok(pending)
    }

    /// Current version and pending update count of every registered updater
    pub fn get_current_status(&self) -> InstallResult<StatusReport> {
        let mut report = StatusReport::new();
        if self.updater_index.is_empty() {
            return Ok(report);
        }

        self.ensure_schema()?;

        for updater in self.get_all_updaters()? {
            let current_version = self.read_version(&updater)?;
            let missing = updater.get_missing_update_since(current_version).len();
            report.insert(updater.name(), UpdaterStatus::new(current_version, missing));
        }

        Ok(report)
    }

    /// Run the install hooks of an updater and record version 0
    ///
    /// Fails with `InvalidArgument` when a version is already recorded for
    /// the updater; the hooks only ever run once.
    pub fn install(&self, name: &str) -> InstallResult<()> {
        let updater = self.get_updater(name)?;
        self.ensure_schema()?;
        self.do_run_install(&updater, true)
    }

    /// Run one update procedure
    ///
    /// With `save`, the version is recorded in the same transaction; without
    /// it the version store is left untouched, which allows replaying an
    /// update.
    pub fn run_single_update(&self, name: &str, version: u32, save: bool) -> InstallResult<()> {
        let updater = self.get_updater(name)?;
        if save {
            self.ensure_schema()?;
        }
        self.do_run_update(&updater, version, save)
    }

    /// Reserved: not implemented
    pub fn run_all_pending_updates(&self) -> InstallResult<()> {
        Err(InstallError::NotImplemented("run_all_pending_updates"))
    }

    /// Reserved: not implemented
    pub fn get_current_version(&self, _name: &str) -> InstallResult<i64> {
        Err(InstallError::NotImplemented("get_current_version"))
    }

    /// `check_installed` is off for the bootstrap, which runs before the
    /// version store exists
    fn do_run_install(&self, updater: &Updater, check_installed: bool) -> InstallResult<()> {
        let runner = self.runner;
        self.in_transaction(|transaction| {
            if check_installed {
                let current_version = VersionStore::new(runner).current_version(updater.name())?;
                if current_version != UNINSTALLED {
                    return Err(InstallError::InvalidArgument(format!(
                        "updater '{}' is already installed (version {})",
                        updater.name(),
                        current_version
                    )));
                }
            }

            updater
                .pre_install(runner, transaction)
                .map_err(InstallError::Procedure)?;
            updater
                .install(runner, transaction)
                .map_err(InstallError::Procedure)?;
            updater
                .post_install(runner, transaction)
                .map_err(InstallError::Procedure)?;

            VersionStore::new(runner).record_version(updater.name(), 0)?;
            Ok(())
        })?;

        info!("installed updater '{}'", updater.name());
        Ok(())
    }

    fn do_run_update(&self, updater: &Updater, version: u32, save: bool) -> InstallResult<()> {
        let callback = updater.get_update_callback(version)?;
        let runner = self.runner;

        self.in_transaction(|transaction| {
            callback(runner, transaction).map_err(InstallError::Procedure)?;
            if save {
                VersionStore::new(runner).record_version(updater.name(), i64::from(version))?;
            }
            Ok(())
        })?;

        info!(
            "ran update {} of '{}'{}",
            version,
            updater.name(),
            if save { "" } else { " (version not saved)" }
        );
        Ok(())
    }

    /// Run `work` in a serializable transaction, rolling back on any error
    fn in_transaction<F>(&self, work: F) -> InstallResult<()>
    where
        F: FnOnce(&dyn Transaction) -> InstallResult<()>,
    {
        let mut transaction = self
            .runner
            .start_transaction(IsolationLevel::Serializable)?;
        transaction.start()?;

        if let Err(e) = work(transaction.as_ref()) {
            rollback(transaction.as_mut());
            return Err(e);
        }

        if let Err(e) = transaction.commit() {
            rollback(transaction.as_mut());
            return Err(e.into());
        }

        debug!("transaction committed");
        Ok(())
    }
}

fn rollback<T: Transaction + ?Sized>(transaction: &mut T) {
    if let Err(e) = transaction.rollback() {
        warn!("rollback failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{DatabaseConn, VERSION_STORE_TABLE};
    use crate::installer::registry::RegistryBuilder;
    use crate::installer::self_updater::SELF_UPDATER_NAME;
    use crate::installer::updater::{UpdateRegistrar, UpdaterDefinition};
    use crate::error::DatabaseError;
    use anyhow::anyhow;
    use rusqlite::types::Value;
    use rusqlite::ToSql;

    /// Declares update1 ("add table") and update3 ("add index")
    struct Foo {
        fail_install: bool,
    }

    impl UpdaterDefinition for Foo {
        fn name(&self) -> &str {
            "Foo"
        }

        fn register_updates(&self, updates: &mut UpdateRegistrar) {
            updates.add_named("update1", Some("add table"), |runner, _| {
                runner.execute("create table foo (id integer, name text)", &[])?;
                Ok(())
            });
            updates.add_named("update3", Some("add index"), |runner, _| {
                runner.execute("create index idx_foo_name on foo(name)", &[])?;
                Ok(())
            });
        }

        fn install(&self, runner: &dyn Runner, transaction: &dyn Transaction) -> anyhow::Result<()> {
            assert!(transaction.is_active());
            assert_eq!(transaction.isolation_level(), IsolationLevel::Serializable);
            runner.execute("create table foo_install (id integer)", &[])?;
            if self.fail_install {
                return Err(anyhow!("install failed on purpose"));
            }
            Ok(())
        }
    }

    /// Two statements, the second one failing
    struct Broken;

    impl UpdaterDefinition for Broken {
        fn name(&self) -> &str {
            "Broken"
        }

        fn register_updates(&self, updates: &mut UpdateRegistrar) {
            updates.add(1, Some("works"), |_, _| Ok(()));
            updates.add(2, Some("fails halfway"), |runner, _| {
                runner.execute("create table broken (id integer)", &[])?;
                runner.execute("insert into missing_table values (1)", &[])?;
                Ok(())
            });
        }
    }

    /// Runner whose transactions never manage to commit
    struct RefusingRunner {
        db: DatabaseConn,
        rollbacks: Rc<Cell<usize>>,
    }

    struct RefusingTransaction<'a> {
        inner: Box<dyn Transaction + 'a>,
        rollbacks: Rc<Cell<usize>>,
    }

    impl Transaction for RefusingTransaction<'_> {
        fn isolation_level(&self) -> IsolationLevel {
            self.inner.isolation_level()
        }

        fn is_active(&self) -> bool {
            self.inner.is_active()
        }

        fn start(&mut self) -> Result<(), DatabaseError> {
            self.inner.start()
        }

        fn commit(&mut self) -> Result<(), DatabaseError> {
            Err(DatabaseError::Transaction("commit refused".to_string()))
        }

        fn rollback(&mut self) -> Result<(), DatabaseError> {
            self.rollbacks.set(self.rollbacks.get() + 1);
            self.inner.rollback()
        }
    }

    impl Runner for RefusingRunner {
        fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize, DatabaseError> {
            self.db.execute(sql, params)
        }

        fn execute_batch(&self, sql: &str) -> Result<(), DatabaseError> {
            self.db.execute_batch(sql)
        }

        fn query_rows(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Vec<Value>>, DatabaseError> {
            self.db.query_rows(sql, params)
        }

        fn start_transaction(
            &self,
            isolation_level: IsolationLevel,
        ) -> Result<Box<dyn Transaction + '_>, DatabaseError> {
            Ok(Box::new(RefusingTransaction {
                inner: self.db.start_transaction(isolation_level)?,
                rollbacks: Rc::clone(&self.rollbacks),
            }))
        }
    }

    fn build(updaters: Vec<(&str, Updater)>) -> (ServiceRegistry, UpdaterIndexes) {
        let mut builder = RegistryBuilder::new();
        for (id, updater) in updaters {
            builder.updater(id, updater).unwrap();
        }
        builder.build()
    }

    fn foo_registry(fail_install: bool) -> (ServiceRegistry, UpdaterIndexes) {
        build(vec![("app.foo", Updater::new(Foo { fail_install }))])
    }

    fn versions(pending: &PendingUpdates, name: &str) -> Vec<(i64, String)> {
        pending
            .get(name)
            .map(|updates| updates.iter().map(|(v, d)| (*v, d.clone())).collect())
            .unwrap_or_default()
    }

    fn row_count(db: &DatabaseConn, name: &str) -> i64 {
        match db
            .query_scalar(
                "select count(*) from goat_schema where name = ?1",
                rusqlite::params![name],
            )
            .unwrap()
        {
            Some(Value::Integer(i)) => i,
            other => panic!("unexpected count {:?}", other),
        }
    }

    #[test]
    fn test_nothing_registered_skips_bootstrap() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = build(vec![]);
        let manager = InstallManager::new(&db, &registry, indexes);

        assert!(manager.get_pending_updates().unwrap().is_empty());
        assert!(manager.get_current_status().unwrap().is_empty());
        assert_eq!(manager.schema_state(), SchemaState::Uninitialized);
        assert!(!db.table_exists(VERSION_STORE_TABLE).unwrap());
    }

    #[test]
    fn test_pending_for_uninstalled_updater() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        let pending = manager.get_pending_updates().unwrap();
        assert_eq!(
            versions(&pending, "Foo"),
            vec![
                (-1, "Installation".to_string()),
                (1, "add table".to_string()),
                (3, "add index".to_string()),
            ]
        );
        assert_eq!(
            serde_json::to_string(&pending).unwrap(),
            r#"{"Foo":{"-1":"Installation","1":"add table","3":"add index"}}"#
        );
        assert_eq!(manager.schema_state(), SchemaState::SchemaVerified);
        assert!(db.table_exists(VERSION_STORE_TABLE).unwrap());
    }

    #[test]
    fn test_status_for_uninstalled_updater() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        let status = manager.get_current_status().unwrap();
        assert_eq!(status.get("Foo"), Some(&UpdaterStatus::new(UNINSTALLED, 2)));
    }

    #[test]
    fn test_partially_applied_updater() {
        let db = DatabaseConn::open_in_memory().unwrap();
        VersionStore::new(&db).create().unwrap();
        VersionStore::new(&db).record_version("Foo", 1).unwrap();

        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        let pending = manager.get_pending_updates().unwrap();
        assert_eq!(versions(&pending, "Foo"), vec![(3, "add index".to_string())]);

        let status = manager.get_current_status().unwrap();
        assert_eq!(status.get("Foo"), Some(&UpdaterStatus::new(1, 1)));
    }

    #[test]
    fn test_fully_applied_updater_is_omitted() {
        let db = DatabaseConn::open_in_memory().unwrap();
        VersionStore::new(&db).create().unwrap();
        VersionStore::new(&db).record_version("Foo", 3).unwrap();

        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        let pending = manager.get_pending_updates().unwrap();
        assert!(pending.get("Foo").is_none());
        assert!(pending.is_empty());

        let status = manager.get_current_status().unwrap();
        assert_eq!(status.get("Foo"), Some(&UpdaterStatus::new(3, 0)));
    }

    #[test]
    fn test_install_records_version_zero() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        manager.install("Foo").unwrap();

        assert!(db.table_exists("foo_install").unwrap());
        assert_eq!(VersionStore::new(&db).current_version("Foo").unwrap(), 0);

        let pending = manager.get_pending_updates().unwrap();
        assert_eq!(
            versions(&pending, "Foo"),
            vec![(1, "add table".to_string()), (3, "add index".to_string())]
        );
    }

    #[test]
    fn test_install_twice_keeps_recorded_version() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        manager.install("Foo").unwrap();
        manager.run_single_update("Foo", 1, true).unwrap();
        manager.run_single_update("Foo", 3, true).unwrap();

        assert!(matches!(
            manager.install("Foo"),
            Err(InstallError::InvalidArgument(_))
        ));
        assert_eq!(VersionStore::new(&db).current_version("Foo").unwrap(), 3);
        assert!(manager.get_pending_updates().unwrap().is_empty());
        assert!(db.conn.is_autocommit());
    }

    #[test]
    fn test_install_after_saved_update_is_rejected() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        manager.run_single_update("Foo", 1, true).unwrap();
        assert!(manager.install("Foo").is_err());
        assert!(!db.table_exists("foo_install").unwrap());
        assert_eq!(VersionStore::new(&db).current_version("Foo").unwrap(), 1);
    }

    #[test]
    fn test_failed_commit_rolls_back() {
        let runner = RefusingRunner {
            db: DatabaseConn::open_in_memory().unwrap(),
            rollbacks: Rc::new(Cell::new(0)),
        };
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&runner, &registry, indexes);

        let err = manager.run_single_update("Foo", 1, false).unwrap_err();
        assert!(matches!(
            err,
            InstallError::Database(DatabaseError::Transaction(ref m)) if m == "commit refused"
        ));
        assert_eq!(runner.rollbacks.get(), 1);
        assert!(!runner.db.table_exists("foo").unwrap());
        assert!(runner.db.conn.is_autocommit());
    }

    #[test]
    fn test_failed_install_leaves_no_row() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = foo_registry(true);
        let manager = InstallManager::new(&db, &registry, indexes);

        let err = manager.install("Foo").unwrap_err();
        assert!(matches!(err, InstallError::Procedure(_)));
        assert_eq!(err.to_string(), "install failed on purpose");

        assert_eq!(row_count(&db, "Foo"), 0);
        assert!(!db.table_exists("foo_install").unwrap());
        assert!(db.conn.is_autocommit());
    }

    #[test]
    fn test_run_single_update_saves_version() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        manager.install("Foo").unwrap();
        manager.run_single_update("Foo", 1, true).unwrap();
        assert!(db.table_exists("foo").unwrap());
        assert_eq!(VersionStore::new(&db).current_version("Foo").unwrap(), 1);

        manager.run_single_update("Foo", 3, true).unwrap();
        assert_eq!(VersionStore::new(&db).current_version("Foo").unwrap(), 3);
        assert_eq!(row_count(&db, "Foo"), 1);
    }

    #[test]
    fn test_run_single_update_without_save() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        manager.install("Foo").unwrap();
        manager.run_single_update("Foo", 1, false).unwrap();

        assert!(db.table_exists("foo").unwrap());
        assert_eq!(VersionStore::new(&db).current_version("Foo").unwrap(), 0);
    }

    #[test]
    fn test_run_single_update_without_save_never_writes_row() {
        let db = DatabaseConn::open_in_memory().unwrap();
        VersionStore::new(&db).create().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        manager.run_single_update("Foo", 1, false).unwrap();
        assert_eq!(row_count(&db, "Foo"), 0);

        // Failing replay
        assert!(manager.run_single_update("Foo", 1, false).is_err());
        assert_eq!(row_count(&db, "Foo"), 0);
    }

    #[test]
    fn test_failed_update_rolls_back() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = build(vec![("app.broken", Updater::new(Broken))]);
        let manager = InstallManager::new(&db, &registry, indexes);

        manager.install("Broken").unwrap();
        manager.run_single_update("Broken", 1, true).unwrap();

        let err = manager.run_single_update("Broken", 2, true).unwrap_err();
        assert!(matches!(err, InstallError::Procedure(_)));
        assert!(!db.table_exists("broken").unwrap());
        assert_eq!(VersionStore::new(&db).current_version("Broken").unwrap(), 1);
        assert!(db.conn.is_autocommit());
    }

    #[test]
    fn test_unknown_update_version() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        assert!(matches!(
            manager.run_single_update("Foo", 2, true),
            Err(InstallError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_get_updater_strips_namespace_separator() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        let plain = manager.get_updater("Foo").unwrap();
        let prefixed = manager.get_updater("\\Foo").unwrap();
        assert!(Rc::ptr_eq(&plain, &prefixed));
    }

    #[test]
    fn test_get_updater_unknown() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        assert!(matches!(
            manager.get_updater("Bar"),
            Err(InstallError::InvalidArgument(_))
        ));
        assert!(matches!(
            manager.install("Bar"),
            Err(InstallError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_service_that_is_not_an_updater() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let mut builder = RegistryBuilder::new();
        builder
            .updater("app.foo", Updater::new(Foo { fail_install: false }))
            .unwrap();
        builder.service("app.mailer", "not an updater").unwrap();
        builder.tag_updater("app.mailer", "app::Mailer", 0).unwrap();
        let (registry, indexes) = builder.build();
        let manager = InstallManager::new(&db, &registry, indexes);

        assert!(matches!(
            manager.get_updater("app::Mailer"),
            Err(InstallError::InvalidArgument(_))
        ));
        assert!(manager.get_updater("Foo").is_ok());

        // One bad registration fails the whole batch
        assert!(matches!(
            manager.get_all_updaters(),
            Err(InstallError::InvalidArgument(_))
        ));
        assert!(matches!(
            manager.get_pending_updates(),
            Err(InstallError::InvalidArgument(_))
        ));
        assert!(matches!(
            manager.get_current_status(),
            Err(InstallError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_tagged_service_missing_from_registry() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let mut builder = RegistryBuilder::new();
        builder.tag_updater("app.ghost", "app::Ghost", 0).unwrap();
        let (registry, indexes) = builder.build();
        let manager = InstallManager::new(&db, &registry, indexes);

        assert!(matches!(
            manager.get_updater("app::Ghost"),
            Err(InstallError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bootstrap_records_self_updater() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        manager.get_current_status().unwrap();
        assert_eq!(
            VersionStore::new(&db)
                .current_version(SELF_UPDATER_NAME)
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_existing_version_store_is_not_bootstrapped() {
        let db = DatabaseConn::open_in_memory().unwrap();
        VersionStore::new(&db).create().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        manager.get_current_status().unwrap();
        assert_eq!(row_count(&db, SELF_UPDATER_NAME), 0);
        assert_eq!(manager.schema_state(), SchemaState::SchemaVerified);
    }

    #[test]
    fn test_updaters_visited_in_index_order() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let mut builder = RegistryBuilder::new();
        builder
            .updater("app.foo", Updater::new(Foo { fail_install: false }))
            .unwrap()
            .updater_with_priority("app.broken", Updater::new(Broken), 5)
            .unwrap();
        let (registry, indexes) = builder.build();
        let manager = InstallManager::new(&db, &registry, indexes);

        let status = manager.get_current_status().unwrap();
        let names: Vec<&String> = status.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Broken", "Foo"]);
    }

    #[test]
    fn test_reserved_operations() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let (registry, indexes) = foo_registry(false);
        let manager = InstallManager::new(&db, &registry, indexes);

        assert!(matches!(
            manager.run_all_pending_updates(),
            Err(InstallError::NotImplemented(_))
        ));
        assert!(matches!(
            manager.get_current_version("Foo"),
            Err(InstallError::NotImplemented(_))
        ));
    }
}
