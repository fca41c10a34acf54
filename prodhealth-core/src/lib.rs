//! Core domain types for the ProdHealth engine.
//!
//! The crate models what a product scan consumes and produces:
//! [`NutritionRecord`] values fetched from a catalog, the optional
//! [`Preferences`] a user keeps, the clamped [`HealthScore`], and the
//! [`Warning`] list shown next to it. It also defines the traits the
//! surrounding application implements for its collaborators:
//! [`CatalogProvider`], [`PreferenceStore`], [`HistoryStore`] and
//! [`HistoryReader`].
//!
//! Nothing in this crate performs I/O. Adapters live in `prodhealth-data`
//! and the scoring rules in `prodhealth-scorer`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod catalog;
pub mod history;
pub mod preferences;
pub mod record;
pub mod score;
pub mod store;
pub mod warning;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use catalog::{CatalogError, CatalogProvider, Product, ProductSummary, normalise_barcode};
pub use history::{Bucket, DayCount, HistoryStats, ScanEntry, WEEKLY_TARGET, daily_series};
pub use preferences::{COMMON_ALLERGENS, Diet, Goal, PreferenceList, Preferences};
pub use record::{IngredientText, Nutrients, NutritionGrade, NutritionRecord};
pub use score::HealthScore;
pub use store::{HistoryReader, HistoryStore, PreferenceStore, UserId, UserIdError};
pub use warning::{Severity, Warning, WarningCategory};
