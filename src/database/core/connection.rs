//! Database connection management
//!
//! This module provides the SQLite connection wrapper used as the engine's
//! database runner.

use crate::database::core::runner::{IsolationLevel, Runner, Transaction};
use crate::database::core::transaction::SqliteTransaction;
use crate::error::DatabaseError;
use anyhow::{anyhow, Result};
use rusqlite::types::Value;
use rusqlite::{Connection, ToSql};

/// Core database connection wrapper
///
/// `DatabaseConn` provides a thin wrapper around SQLite connections,
/// handling both file-based and in-memory databases with consistent
/// configuration, and implements [`Runner`] for the install engine.
pub struct DatabaseConn {
    pub conn: Connection,
}

impl DatabaseConn {
    /// Open a database at the specified path
    ///
    /// If the path is `None`, an in-memory database is created.
    pub fn open(path: Option<&str>) -> Result<Self> {
        let conn = match path {
            Some(p) => Connection::open(p)
                .map_err(|e| anyhow!("Failed to open database at '{}': {}", p, e))?,
            None => Connection::open_in_memory()
                .map_err(|e| anyhow!("Failed to create in-memory database: {}", e))?,
        };

        let db = DatabaseConn { conn };
        db.configure()?;
        Ok(db)
    }

    /// Open a database at the specified path (convenience method)
    pub fn open_path(path: &str) -> Result<Self> {
        Self::open(Some(path))
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open(None)
    }

    fn configure(&self) -> Result<()> {
        // WAL lets readers proceed while an update transaction holds the write lock
        let _: String = self
            .conn
            .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to set journal mode: {}", e))?;

        self.conn
            .execute("PRAGMA synchronous=NORMAL", [])
            .map_err(|e| anyhow!("Failed to set synchronous mode: {}", e))?;

        self.conn
            .busy_timeout(std::time::Duration::from_secs(5))
            .map_err(|e| anyhow!("Failed to set busy timeout: {}", e))?;

        self.conn
            .execute("PRAGMA foreign_keys=ON", [])
            .map_err(|e| anyhow!("Failed to enable foreign keys: {}", e))?;

        Ok(())
    }

    /// Check if a table exists in the database
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let count: i32 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [table_name],
                |row| row.get(0),
            )
            .map_err(|e| anyhow!("Failed to check table existence: {}", e))?;
        Ok(count > 0)
    }
}

impl Runner for DatabaseConn {
    fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize, DatabaseError> {
        Ok(self.conn.execute(sql, params)?)
    }

    fn execute_batch(&self, sql: &str) -> Result<(), DatabaseError> {
        Ok(self.conn.execute_batch(sql)?)
    }

    fn query_rows(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<Vec<Value>>, DatabaseError> {
        let mut stmt = self.conn.prepare(sql)?;
        let column_count = stmt.column_count();
        let rows = stmt.query_map(params, |row| {
            (0..column_count)
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Vec<Value>>>()
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn start_transaction(
        &self,
        isolation_level: IsolationLevel,
    ) -> Result<Box<dyn Transaction + '_>, DatabaseError> {
        Ok(Box::new(SqliteTransaction::new(&self.conn, isolation_level)))
    }
}
