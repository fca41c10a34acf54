//! In-memory collaborators used by unit and behaviour tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use time::OffsetDateTime;

use crate::{
    CatalogError, CatalogProvider, HistoryReader, HistoryStore, PreferenceStore, Preferences,
    Product, ProductSummary, ScanEntry, UserId, normalise_barcode,
};

/// Stub `CatalogProvider` serving a fixed product list.
///
/// Search matches product names case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StubCatalogProvider {
    products: Vec<Product>,
    error: Option<CatalogError>,
}

impl StubCatalogProvider {
    /// Create a catalog containing one product.
    #[must_use]
    pub fn with_product(product: Product) -> Self {
        Self::with_products(std::iter::once(product))
    }

    /// Create a catalog from a collection of products.
    #[must_use]
    pub fn with_products<I>(products: I) -> Self
    where
        I: IntoIterator<Item = Product>,
    {
        Self {
            products: products.into_iter().collect(),
            error: None,
        }
    }

    /// Create a catalog that fails every lookup with `error`.
    #[must_use]
    pub const fn with_error(error: CatalogError) -> Self {
        Self {
            products: Vec::new(),
            error: Some(error),
        }
    }

    fn check(&self) -> Result<(), CatalogError> {
        self.error.clone().map_or(Ok(()), Err)
    }
}

impl CatalogProvider for StubCatalogProvider {
    fn product(&self, barcode: &str) -> Result<Option<Product>, CatalogError> {
        let code = normalise_barcode(barcode)?;
        self.check()?;
        Ok(self.products.iter().find(|p| p.code == code).cloned())
    }

    fn search(&self, query: &str) -> Result<Vec<ProductSummary>, CatalogError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(CatalogError::EmptyQuery);
        }
        self.check()?;
        Ok(self
            .products
            .iter()
            .filter(|p| {
                p.name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .map(|p| ProductSummary {
                code: p.code.clone(),
                name: p.name.clone(),
                brand: p.brand.clone(),
                image_url: p.image_url.clone(),
            })
            .collect())
    }
}

/// Failure of an in-memory store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemoryStoreError {
    /// A previous holder of the lock panicked.
    #[error("in-memory store lock poisoned")]
    Poisoned,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, MemoryStoreError> {
    mutex.lock().map_err(|_| MemoryStoreError::Poisoned)
}

/// `PreferenceStore` backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    rows: Mutex<HashMap<UserId, Preferences>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    type Error = MemoryStoreError;

    fn load(&self, user: &UserId) -> Result<Option<Preferences>, Self::Error> {
        Ok(lock(&self.rows)?.get(user).cloned())
    }

    fn save(&self, user: &UserId, preferences: &Preferences) -> Result<(), Self::Error> {
        lock(&self.rows)?.insert(user.clone(), preferences.clone());
        Ok(())
    }
}

/// `HistoryStore` and `HistoryReader` backed by a `Vec` in insertion order.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<Vec<ScanEntry>>,
}

impl MemoryHistoryStore {
    /// Snapshot every stored entry.
    ///
    /// # Errors
    /// Returns [`MemoryStoreError::Poisoned`] if the lock is poisoned.
    pub fn entries(&self) -> Result<Vec<ScanEntry>, MemoryStoreError> {
        Ok(lock(&self.entries)?.clone())
    }
}

impl HistoryStore for MemoryHistoryStore {
    type Error = MemoryStoreError;

    fn append(&self, entry: &ScanEntry) -> Result<(), Self::Error> {
        lock(&self.entries)?.push(entry.clone());
        Ok(())
    }
}

impl HistoryReader for MemoryHistoryStore {
    type Error = MemoryStoreError;

    fn recent(&self, user: &UserId, limit: usize) -> Result<Vec<ScanEntry>, Self::Error> {
        let mut found = self.for_user(user)?;
        found.sort_by(|a, b| b.scanned_at.cmp(&a.scanned_at));
        found.truncate(limit);
        Ok(found)
    }

    fn for_user(&self, user: &UserId) -> Result<Vec<ScanEntry>, Self::Error> {
        let mut found: Vec<_> = lock(&self.entries)?
            .iter()
            .filter(|e| &e.user_id == user)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.scanned_at);
        Ok(found)
    }

    fn since(&self, instant: OffsetDateTime) -> Result<Vec<ScanEntry>, Self::Error> {
        let mut found: Vec<_> = lock(&self.entries)?
            .iter()
            .filter(|e| e.scanned_at >= instant)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.scanned_at);
        Ok(found)
    }

    fn count(&self) -> Result<u64, Self::Error> {
        let len = lock(&self.entries)?.len();
        Ok(u64::try_from(len).unwrap_or(u64::MAX))
    }
}
