//! Error types emitted by the ProdHealth CLI.
//!
//! Every command returns `Result<_, CliError>`; `main` prints the error and
//! exits with status 1.

use std::sync::Arc;

use camino::Utf8PathBuf;
use prodhealth_core::{CatalogError, UserIdError};
use prodhealth_data::{ProviderBuildError, SqliteStoreError};
use prodhealth_scorer::WeightsError;
use thiserror::Error;

/// Errors emitted by the ProdHealth CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The user identifier was blank.
    #[error("invalid --user value: {0}")]
    InvalidUser(#[from] UserIdError),
    /// The weights file could not be opened.
    #[error("failed to open weights file {path:?}: {source}")]
    OpenWeights {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The weights file is not valid JSON for the weight tables.
    #[error("failed to parse weights file {path:?}: {source}")]
    ParseWeights {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The weights file holds a negative or non-finite constant.
    #[error("invalid weights: {0}")]
    InvalidWeights(#[from] WeightsError),
    /// The HTTP catalog client could not be built.
    #[error("failed to build catalog client for {base_url}: {source}")]
    BuildCatalog {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// A catalog lookup failed.
    #[error("catalog lookup failed: {0}")]
    Catalog(#[from] CatalogError),
    /// The catalog has no product for the barcode.
    #[error("no product found for barcode {barcode}")]
    ProductNotFound { barcode: String },
    /// The preference and history database failed.
    #[error("store error: {0}")]
    Store(#[from] SqliteStoreError),
    /// JSON output could not be produced.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing to stdout failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
