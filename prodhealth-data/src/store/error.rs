use std::io;

use camino::Utf8PathBuf;
use rusqlite::Error as SqliteError;
use thiserror::Error;

use super::schema::SchemaError;

/// Errors raised by [`super::SqliteStore`].
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// The database directory could not be created.
    #[error("failed to prepare database directory for {path}")]
    Directory {
        /// Database path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The database file could not be opened.
    #[error("failed to open SQLite database {path}")]
    Open {
        /// Database path.
        path: Utf8PathBuf,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
    /// Schema creation failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A query failed.
    #[error("SQLite operation '{operation}' failed")]
    Sqlite {
        /// Operation that failed.
        operation: &'static str,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
    /// Preferences could not be encoded or decoded as JSON.
    #[error("failed to {action} preferences as JSON")]
    Json {
        /// `encode` or `decode`.
        action: &'static str,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
    /// A timestamp could not be written in storage format.
    #[error("failed to format scan timestamp")]
    FormatTimestamp {
        /// Underlying formatting error.
        #[source]
        source: time::error::Format,
    },
    /// A stored row held a value outside its domain.
    #[error("stored {column} value '{value}' is invalid")]
    Corrupt {
        /// Column name.
        column: &'static str,
        /// Offending value.
        value: String,
    },
    /// A thread panicked while holding the connection lock.
    #[error("SQLite connection lock poisoned")]
    Poisoned,
}
