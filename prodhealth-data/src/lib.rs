//! Adapters connecting the ProdHealth engine to the outside world.
//!
//! Responsibilities:
//! - Fetch products from Open Food Facts ([`catalog`]).
//! - Persist preferences and scan history in SQLite ([`store`]).
//!
//! Boundaries:
//! - No scoring rules live here (see `prodhealth-scorer`).
//! - Every adapter implements a trait from `prodhealth-core`, so callers can
//!   swap in the in-memory doubles for tests.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod fs;
pub mod store;

pub use catalog::{HttpCatalogProvider, HttpCatalogProviderConfig, ProviderBuildError};
pub use store::{SqliteStore, SqliteStoreError};
