//! Database runner contract
//!
//! The install engine never talks to a driver directly. Everything goes
//! through [`Runner`], which executes parameterized statements and opens
//! transactions, and [`Transaction`], the handle for one unit of work.

use crate::error::DatabaseError;
use rusqlite::types::Value;
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction isolation levels a caller may request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IsolationLevel {
    ReadUncommitted,
    #[default]
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadUncommitted => write!(f, "read uncommitted"),
            Self::ReadCommitted => write!(f, "read committed"),
            Self::RepeatableRead => write!(f, "repeatable read"),
            Self::Serializable => write!(f, "serializable"),
        }
    }
}

/// A unit of work opened by [`Runner::start_transaction`]
///
/// `rollback` must be safe to call at any point: on a transaction that was
/// never started, one that already finished, or one whose commit failed.
pub trait Transaction {
    /// Isolation level requested when the transaction was created
    fn isolation_level(&self) -> IsolationLevel;

    /// Whether the transaction has started and not yet finished
    fn is_active(&self) -> bool;

    fn start(&mut self) -> Result<(), DatabaseError>;

    fn commit(&mut self) -> Result<(), DatabaseError>;

    fn rollback(&mut self) -> Result<(), DatabaseError>;
}

/// Executes statements against the target database
pub trait Runner {
    /// Execute a statement, returning the number of affected rows
    fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize, DatabaseError>;

    /// Execute several `;`-separated statements without parameters
    fn execute_batch(&self, sql: &str) -> Result<(), DatabaseError>;

    /// Run a query and collect every row
    fn query_rows(&self, sql: &str, params: &[&dyn ToSql])
        -> Result<Vec<Vec<Value>>, DatabaseError>;

    /// Run a query and return the first column of the first row, if any
    fn query_scalar(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Option<Value>, DatabaseError> {
        Ok(self
            .query_rows(sql, params)?
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next()))
    }

    /// Create a transaction handle; the caller is responsible for `start()`
    fn start_transaction(
        &self,
        isolation_level: IsolationLevel,
    ) -> Result<Box<dyn Transaction + '_>, DatabaseError>;
}

/// Read an integer out of a scalar query result
///
/// `NULL` and a missing row both yield `None`.
pub fn scalar_as_i64(value: Option<Value>) -> Result<Option<i64>, DatabaseError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Integer(i)) => Ok(Some(i)),
        Some(Value::Text(s)) => s.trim().parse().map(Some).map_err(|_| {
            DatabaseError::Driver(rusqlite::Error::InvalidColumnType(
                0,
                "version".to_string(),
                rusqlite::types::Type::Text,
            ))
        }),
        Some(other) => Err(DatabaseError::Driver(rusqlite::Error::InvalidColumnType(
            0,
            "version".to_string(),
            other.data_type(),
        ))),
    }
}
