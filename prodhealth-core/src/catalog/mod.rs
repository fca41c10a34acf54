//! Look up products in an external nutrition catalog.
//!
//! The [`CatalogProvider`] trait abstracts retrieval of a [`Product`] by
//! barcode and of [`ProductSummary`] lists by free-text query. Lookups that
//! find nothing are not errors: [`CatalogProvider::product`] returns
//! `Ok(None)`.

mod error;
mod provider;

pub use error::CatalogError;
pub use provider::{CatalogProvider, Product, ProductSummary, normalise_barcode};
