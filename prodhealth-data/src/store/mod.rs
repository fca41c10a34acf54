//! SQLite persistence for user preferences and scan history.
//!
//! - [`schema`] creates and versions the tables.
//! - [`SqliteStore`] implements [`prodhealth_core::PreferenceStore`],
//!   [`prodhealth_core::HistoryStore`] and [`prodhealth_core::HistoryReader`]
//!   over a single database file.
#![forbid(unsafe_code)]

mod error;
pub mod schema;
mod sqlite;

pub use error::SqliteStoreError;
pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema};
pub use sqlite::SqliteStore;
