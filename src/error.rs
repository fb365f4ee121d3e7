//! Error types
//!
//! Library operations return one of the typed errors below. Update procedures
//! and lifecycle hooks return `anyhow::Result`, and whatever they raise is
//! carried back to the caller unchanged inside [`InstallError::Procedure`].

use rusqlite::ErrorCode;
use thiserror::Error;

/// Failure reported by a database runner
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The SQLite driver rejected a statement or connection operation
    #[error("database driver error: {0}")]
    Driver(#[from] rusqlite::Error),

    /// A transaction was used outside of its valid lifecycle
    #[error("transaction error: {0}")]
    Transaction(String),
}

impl DatabaseError {
    /// Whether the driver reported that the object being created already exists
    ///
    /// SQLite reports this as a generic `SQLITE_ERROR`, either while preparing
    /// the statement (`SqlInputError`) or while running it (`SqliteFailure`),
    /// so the message is what tells it apart.
    pub fn is_already_exists(&self) -> bool {
        let (code, message) = match self {
            DatabaseError::Driver(rusqlite::Error::SqliteFailure(error, Some(message))) => {
                (error.code, message.as_str())
            }
            DatabaseError::Driver(rusqlite::Error::SqlInputError { error, msg, .. }) => {
                (error.code, msg.as_str())
            }
            _ => return false,
        };
        matches!(code, ErrorCode::Unknown) && message.contains("already exists")
    }
}

/// Failure raised by the service registry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("service '{0}' does not exist")]
    NotFound(String),

    #[error("service '{0}' is already registered")]
    Duplicate(String),

    #[error("updater identifier '{0}' is already registered")]
    DuplicateIdentifier(String),

    #[error("updater identifier '{0}' must be non-empty and must not start with '\\'")]
    InvalidIdentifier(String),
}

/// Failure raised by the install manager
#[derive(Debug, Error)]
pub enum InstallError {
    /// Configuration problem: unknown updater, service that is not an updater,
    /// or an update version that does not exist
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Reserved operation without an implementation
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// Runner failure outside of an update procedure
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Failure raised by an install hook or update procedure
    #[error(transparent)]
    Procedure(anyhow::Error),
}

impl From<RegistryError> for InstallError {
    fn from(err: RegistryError) -> Self {
        InstallError::InvalidArgument(err.to_string())
    }
}

pub type InstallResult<T> = std::result::Result<T, InstallError>;
