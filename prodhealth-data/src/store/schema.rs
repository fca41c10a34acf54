//! Table creation and schema versioning for the SQLite store.

#![forbid(unsafe_code)]

use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

/// Version recorded in `prodhealth_schema_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Create the profile and scan tables inside a SQLite database.
///
/// Running it against an initialised database is a no-op. A database
/// created by a different schema version is rejected rather than migrated.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use prodhealth_data::store::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create schema");
/// initialise_schema(&mut conn).expect("schema creation is idempotent");
///
/// let scans: i64 = conn
///     .query_row("SELECT COUNT(*) FROM scans", [], |row| row.get(0))
///     .expect("count scans");
/// assert_eq!(scans, 0);
/// ```
///
/// # Errors
/// Returns [`SchemaError`] when a statement fails or the stored version
/// differs from [`SCHEMA_VERSION`].
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| SchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    create_indexes(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create profiles",
        "CREATE TABLE IF NOT EXISTS profiles (
            user_id TEXT PRIMARY KEY CHECK (length(trim(user_id)) > 0),
            preferences TEXT NOT NULL CHECK (json_valid(preferences)),
            updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;
    run_migration_step(
        transaction,
        "create scans",
        "CREATE TABLE IF NOT EXISTS scans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL CHECK (length(trim(user_id)) > 0),
            barcode TEXT NOT NULL,
            product_name TEXT,
            brand TEXT,
            image_url TEXT,
            nutrition_grade TEXT CHECK (nutrition_grade IN ('A', 'B', 'C', 'D', 'E')),
            nova_group INTEGER,
            score INTEGER NOT NULL CHECK (score BETWEEN 0 AND 100),
            scanned_at TEXT NOT NULL
        )",
    )
}

fn create_indexes(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "index scans by user",
        "CREATE INDEX IF NOT EXISTS idx_scans_user_time ON scans(user_id, scanned_at)",
    )?;
    run_migration_step(
        transaction,
        "index scans by time",
        "CREATE INDEX IF NOT EXISTS idx_scans_time ON scans(scanned_at)",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS prodhealth_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing: Option<i64> = transaction
        .query_row(
            "SELECT version FROM prodhealth_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing {
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(SchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO prodhealth_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| SchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

/// Errors raised when initialising the store schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Enabling the foreign key pragma failed.
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
    /// A schema statement failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// Step that failed.
        step: &'static str,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
    /// The database was created by another schema version.
    #[error("expected store schema version {expected} but found {found}; apply migrations before retrying")]
    VersionMismatch {
        /// Version this build understands.
        expected: i64,
        /// Version found in the database.
        found: i64,
    },
}
