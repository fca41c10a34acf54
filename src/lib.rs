//! Facade crate for the ProdHealth scoring engine.
//!
//! This crate re-exports the core domain types and the scorer, and exposes the
//! Open Food Facts client and SQLite store behind feature flags.

#![forbid(unsafe_code)]

pub use prodhealth_core::{
    CatalogError, CatalogProvider, HealthScore, HistoryReader, HistoryStats, HistoryStore,
    Nutrients, NutritionGrade, NutritionRecord, PreferenceStore, Preferences, Product,
    ProductSummary, ScanEntry, Severity, UserId, Warning, WarningCategory,
};
pub use prodhealth_scorer::{
    Analyser, Analysis, BaselineScorer, BaselineWeights, PersonalizationWeights, Personalizer,
    WeightsError, analyse, personalize, score, warnings,
};

#[cfg(feature = "catalog-http")]
pub use prodhealth_data::catalog::{HttpCatalogProvider, HttpCatalogProviderConfig, ProviderBuildError};

#[cfg(feature = "store-sqlite")]
pub use prodhealth_data::store::{SqliteStore, SqliteStoreError};

#[cfg(feature = "test-support")]
pub use prodhealth_core::test_support;
