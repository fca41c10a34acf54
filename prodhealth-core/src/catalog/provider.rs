//! Catalog provider trait and the product shapes it returns.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::NutritionRecord;

use super::error::CatalogError;

/// A product with its nutrition record and display metadata.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Product {
    /// Barcode.
    pub code: String,
    /// Product name.
    pub name: Option<String>,
    /// Brand or brands, comma separated.
    pub brand: Option<String>,
    /// Front image URL.
    pub image_url: Option<String>,
    /// Nutrition data used for scoring.
    pub record: NutritionRecord,
}

/// A search hit; carries no nutrition data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProductSummary {
    /// Barcode.
    pub code: String,
    /// Product name, falling back to the generic name.
    pub name: Option<String>,
    /// Brand or brands, comma separated.
    pub brand: Option<String>,
    /// Thumbnail URL.
    pub image_url: Option<String>,
}

/// Fetch products from a nutrition catalog.
///
/// Implementations are read-only. Retry and caching policy is left to the
/// implementation.
///
/// # Examples
///
/// ```rust
/// use prodhealth_core::{CatalogError, CatalogProvider, Product, ProductSummary, normalise_barcode};
///
/// struct EmptyCatalog;
///
/// impl CatalogProvider for EmptyCatalog {
///     fn product(&self, barcode: &str) -> Result<Option<Product>, CatalogError> {
///         normalise_barcode(barcode)?;
///         Ok(None)
///     }
///
///     fn search(&self, query: &str) -> Result<Vec<ProductSummary>, CatalogError> {
///         if query.trim().is_empty() {
///             return Err(CatalogError::EmptyQuery);
///         }
///         Ok(Vec::new())
///     }
/// }
///
/// assert_eq!(EmptyCatalog.product("8901063010031")?, None);
/// assert_eq!(EmptyCatalog.search(" "), Err(CatalogError::EmptyQuery));
/// # Ok::<(), CatalogError>(())
/// ```
pub trait CatalogProvider {
    /// Look up a product by barcode.
    ///
    /// Returns `Ok(None)` when the catalog has no such product.
    fn product(&self, barcode: &str) -> Result<Option<Product>, CatalogError>;

    /// Search products by free text.
    ///
    /// Implementations must return `Err(CatalogError::EmptyQuery)` for blank
    /// queries.
    fn search(&self, query: &str) -> Result<Vec<ProductSummary>, CatalogError>;
}

/// Trim a barcode and check it is non-empty ASCII alphanumerics.
///
/// # Errors
/// Returns [`CatalogError::InvalidBarcode`] otherwise.
pub fn normalise_barcode(barcode: &str) -> Result<&str, CatalogError> {
    let trimmed = barcode.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CatalogError::InvalidBarcode {
            barcode: barcode.to_owned(),
        });
    }
    Ok(trimmed)
}
