#![forbid(unsafe_code)]

use std::sync::{Mutex, MutexGuard};

use camino::Utf8Path;
use log::{debug, warn};
use prodhealth_core::{
    HealthScore, HistoryReader, HistoryStore, NutritionGrade, PreferenceStore, Preferences,
    ScanEntry, UserId,
};
use rusqlite::{Connection, OptionalExtension, Row, params};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use super::error::SqliteStoreError;
use super::schema::initialise_schema;

/// Fixed-width UTC timestamps so lexical order matches chronological order.
const STORED_TIMESTAMP: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"
);

const SCAN_COLUMNS: &str = "user_id, barcode, product_name, brand, image_url, \
     nutrition_grade, nova_group, score, scanned_at";

/// SQLite-backed preference and history store.
///
/// One connection is shared behind a mutex, so the store can be used from
/// several threads. All three persistence traits are implemented on the
/// same type because profiles and scans live in one database file.
///
/// # Examples
/// ```
/// use prodhealth_core::{PreferenceStore, Preferences, UserId};
/// use prodhealth_data::store::SqliteStore;
///
/// let store = SqliteStore::open_in_memory()?;
/// let user = UserId::new("user-1")?;
/// assert_eq!(store.load(&user)?, None);
///
/// let prefs = Preferences::default().with_allergen("Peanuts");
/// store.save(&user, &prefs)?;
/// assert_eq!(store.load(&user)?, Some(prefs));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SqliteStore {
    connection: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database file, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] when the directory, the file or the
    /// schema cannot be prepared.
    pub fn open(path: &Utf8Path) -> Result<Self, SqliteStoreError> {
        crate::fs::ensure_parent_dir(path).map_err(|source| SqliteStoreError::Directory {
            path: path.to_owned(),
            source,
        })?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| SqliteStoreError::Open {
                path: path.to_owned(),
                source,
            })?;
        debug!("opened store at {path}");
        Self::from_connection(connection)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] when the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let connection = Connection::open_in_memory().map_err(|source| SqliteStoreError::Open {
            path: ":memory:".into(),
            source,
        })?;
        Self::from_connection(connection)
    }

    /// Wrap an existing connection, initialising the schema first.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError::Schema`] when initialisation fails.
    pub fn from_connection(mut connection: Connection) -> Result<Self, SqliteStoreError> {
        initialise_schema(&mut connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection
            .lock()
            .map_err(|_| SqliteStoreError::Poisoned)
    }

    fn query_scans(
        &self,
        operation: &'static str,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<ScanEntry>, SqliteStoreError> {
        let connection = self.lock()?;
        let mut statement = connection
            .prepare_cached(sql)
            .map_err(|source| SqliteStoreError::Sqlite { operation, source })?;
        let rows = statement
            .query_map(params, StoredScan::from_row)
            .map_err(|source| SqliteStoreError::Sqlite { operation, source })?;
        rows.map(|row| {
            row.map_err(|source| SqliteStoreError::Sqlite { operation, source })
                .and_then(StoredScan::into_entry)
        })
        .collect()
    }
}

impl PreferenceStore for SqliteStore {
    type Error = SqliteStoreError;

    fn load(&self, user: &UserId) -> Result<Option<Preferences>, Self::Error> {
        let stored: Option<String> = self
            .lock()?
            .query_row(
                "SELECT preferences FROM profiles WHERE user_id = ?1",
                [user.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|source| SqliteStoreError::Sqlite {
                operation: "load preferences",
                source,
            })?;
        stored
            .map(|json| {
                serde_json::from_str(&json).map_err(|source| SqliteStoreError::Json {
                    action: "decode",
                    source,
                })
            })
            .transpose()
    }

    fn save(&self, user: &UserId, preferences: &Preferences) -> Result<(), Self::Error> {
        let json = serde_json::to_string(preferences).map_err(|source| SqliteStoreError::Json {
            action: "encode",
            source,
        })?;
        self.lock()?
            .execute(
                "INSERT INTO profiles (user_id, preferences) VALUES (?1, ?2)
                 ON CONFLICT(user_id) DO UPDATE SET
                    preferences = excluded.preferences,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
                params![user.as_str(), json],
            )
            .map_err(|source| SqliteStoreError::Sqlite {
                operation: "save preferences",
                source,
            })?;
        debug!("saved preferences for {user}");
        Ok(())
    }
}

impl HistoryStore for SqliteStore {
    type Error = SqliteStoreError;

    fn append(&self, entry: &ScanEntry) -> Result<(), Self::Error> {
        let scanned_at = format_timestamp(entry.scanned_at)?;
        self.lock()?
            .execute(
                "INSERT INTO scans (user_id, barcode, product_name, brand, image_url,
                    nutrition_grade, nova_group, score, scanned_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    entry.user_id.as_str(),
                    entry.barcode,
                    entry.product_name,
                    entry.brand,
                    entry.image_url,
                    entry.nutrition_grade.map(NutritionGrade::as_str),
                    entry.nova_group,
                    entry.score.value(),
                    scanned_at,
                ],
            )
            .map_err(|source| SqliteStoreError::Sqlite {
                operation: "append scan",
                source,
            })?;
        Ok(())
    }
}

impl HistoryReader for SqliteStore {
    type Error = SqliteStoreError;

    fn recent(&self, user: &UserId, limit: usize) -> Result<Vec<ScanEntry>, Self::Error> {
        let max_rows = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_scans(
            "read recent scans",
            &format!(
                "SELECT {SCAN_COLUMNS} FROM scans WHERE user_id = ?1
                 ORDER BY scanned_at DESC, id DESC LIMIT ?2"
            ),
            params![user.as_str(), max_rows],
        )
    }

    fn for_user(&self, user: &UserId) -> Result<Vec<ScanEntry>, Self::Error> {
        self.query_scans(
            "read user scans",
            &format!(
                "SELECT {SCAN_COLUMNS} FROM scans WHERE user_id = ?1 ORDER BY scanned_at, id"
            ),
            [user.as_str()],
        )
    }

    fn since(&self, instant: OffsetDateTime) -> Result<Vec<ScanEntry>, Self::Error> {
        let from = format_timestamp(instant)?;
        self.query_scans(
            "read scans since",
            &format!("SELECT {SCAN_COLUMNS} FROM scans WHERE scanned_at >= ?1 ORDER BY scanned_at, id"),
            [from],
        )
    }

    fn count(&self) -> Result<u64, Self::Error> {
        let total: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM scans", [], |row| row.get(0))
            .map_err(|source| SqliteStoreError::Sqlite {
                operation: "count scans",
                source,
            })?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}

fn format_timestamp(instant: OffsetDateTime) -> Result<String, SqliteStoreError> {
    instant
        .to_offset(UtcOffset::UTC)
        .format(STORED_TIMESTAMP)
        .map_err(|source| SqliteStoreError::FormatTimestamp { source })
}

/// A `scans` row before domain validation.
struct StoredScan {
    user_id: String,
    barcode: String,
    product_name: Option<String>,
    brand: Option<String>,
    image_url: Option<String>,
    nutrition_grade: Option<String>,
    nova_group: Option<u8>,
    score: u8,
    scanned_at: String,
}

impl StoredScan {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(0)?,
            barcode: row.get(1)?,
            product_name: row.get(2)?,
            brand: row.get(3)?,
            image_url: row.get(4)?,
            nutrition_grade: row.get(5)?,
            nova_group: row.get(6)?,
            score: row.get(7)?,
            scanned_at: row.get(8)?,
        })
    }

    fn into_entry(self) -> Result<ScanEntry, SqliteStoreError> {
        let user_id = UserId::new(&self.user_id).map_err(|_| SqliteStoreError::Corrupt {
            column: "user_id",
            value: self.user_id.clone(),
        })?;
        let score = HealthScore::new(self.score).ok_or_else(|| SqliteStoreError::Corrupt {
            column: "score",
            value: self.score.to_string(),
        })?;
        let scanned_at = OffsetDateTime::parse(&self.scanned_at, &Rfc3339).map_err(|_| {
            SqliteStoreError::Corrupt {
                column: "scanned_at",
                value: self.scanned_at.clone(),
            }
        })?;
        let nutrition_grade = self.nutrition_grade.as_deref().and_then(|raw| {
            let grade = NutritionGrade::parse(raw);
            if grade.is_none() {
                warn!("ignoring stored nutrition grade {raw:?}");
            }
            grade
        });
        Ok(ScanEntry {
            user_id,
            barcode: self.barcode,
            product_name: self.product_name,
            brand: self.brand,
            image_url: self.image_url,
            nutrition_grade,
            nova_group: self.nova_group,
            score,
            scanned_at,
        })
    }
}
