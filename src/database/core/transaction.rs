//! SQLite transaction handle

use crate::database::core::runner::{IsolationLevel, Transaction};
use crate::error::DatabaseError;
use rusqlite::Connection;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransactionState {
    Created,
    Active,
    Committed,
    RolledBack,
}

/// Explicit `BEGIN`/`COMMIT`/`ROLLBACK` transaction over a borrowed connection
///
/// SQLite transactions are always serializable. `Serializable` is mapped to
/// `BEGIN IMMEDIATE` so the write lock is taken when the transaction starts;
/// weaker levels use a deferred transaction. A handle dropped while still
/// active is rolled back.
pub struct SqliteTransaction<'a> {
    conn: &'a Connection,
    isolation_level: IsolationLevel,
    state: TransactionState,
}

impl<'a> SqliteTransaction<'a> {
    pub fn new(conn: &'a Connection, isolation_level: IsolationLevel) -> Self {
        Self {
            conn,
            isolation_level,
            state: TransactionState::Created,
        }
    }

    fn begin_statement(&self) -> &'static str {
        match self.isolation_level {
            IsolationLevel::Serializable => "BEGIN IMMEDIATE",
            _ => "BEGIN DEFERRED",
        }
    }
}

impl Transaction for SqliteTransaction<'_> {
    fn isolation_level(&self) -> IsolationLevel {
        self.isolation_level
    }

    fn is_active(&self) -> bool {
        self.state == TransactionState::Active
    }

    fn start(&mut self) -> Result<(), DatabaseError> {
        if self.state != TransactionState::Created {
            return Err(DatabaseError::Transaction(
                "transaction has already been started".to_string(),
            ));
        }
        self.conn.execute_batch(self.begin_statement())?;
        self.state = TransactionState::Active;
        debug!("started {} transaction", self.isolation_level);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DatabaseError> {
        if self.state != TransactionState::Active {
            return Err(DatabaseError::Transaction(
                "cannot commit a transaction that is not active".to_string(),
            ));
        }
        // A failed COMMIT leaves the transaction open, state stays Active
        self.conn.execute_batch("COMMIT")?;
        self.state = TransactionState::Committed;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DatabaseError> {
        if self.state != TransactionState::Active {
            return Ok(());
        }
        self.state = TransactionState::RolledBack;
        if self.conn.is_autocommit() {
            // SQLite already rolled back on its own
            return Ok(());
        }
        self.conn.execute_batch("ROLLBACK")?;
        debug!("rolled back {} transaction", self.isolation_level);
        Ok(())
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if self.is_active() {
            if let Err(e) = self.rollback() {
                warn!("failed to roll back dropped transaction: {}", e);
            }
        }
    }
}
