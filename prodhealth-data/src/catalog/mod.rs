//! HTTP catalog provider for Open Food Facts.
//!
//! [`HttpCatalogProvider`] implements [`prodhealth_core::CatalogProvider`]
//! against the public product and search endpoints. Unknown barcodes map to
//! `Ok(None)`; transport failures map to the matching
//! [`prodhealth_core::CatalogError`] variant.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use prodhealth_core::CatalogProvider;
//! use prodhealth_data::catalog::{HttpCatalogProvider, HttpCatalogProviderConfig};
//!
//! let config = HttpCatalogProviderConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_country(None);
//! let catalog = HttpCatalogProvider::with_config(config)?;
//! for hit in catalog.search("masala oats")? {
//!     println!("{} {}", hit.code, hit.name.unwrap_or_default());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod off;
mod provider;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpCatalogProvider, HttpCatalogProviderConfig,
    ProviderBuildError, parse_product, parse_search,
};
