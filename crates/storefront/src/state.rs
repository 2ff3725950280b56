//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use shopcart_core::Quantity;
use shopcart_store::{CartStorage, CartStore, Catalog, MemoryStorage, ShippingPolicy};

use crate::config::StorefrontConfig;

/// Cart storage shared by every session.
pub type SharedStorage = Arc<dyn CartStorage>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the cart storage and the configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    storage: SharedStorage,
    writes: Mutex<()>,
}

impl AppState {
    /// Create state backed by process-local cart storage.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self::with_storage(config, catalog, Arc::new(MemoryStorage::new()))
    }

    /// Create state over an explicit storage backend.
    #[must_use]
    pub fn with_storage(config: StorefrontConfig, catalog: Catalog, storage: SharedStorage) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                storage,
                writes: Mutex::new(()),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn shipping(&self) -> ShippingPolicy {
        self.inner.config.shipping
    }

    #[must_use]
    pub fn max_add_quantity(&self) -> Quantity {
        self.inner.config.max_add_quantity
    }

    /// The cart storage shared by every session.
    #[must_use]
    pub fn storage(&self) -> &SharedStorage {
        &self.inner.storage
    }

    /// A store for the cart record at `key`.
    #[must_use]
    pub fn cart_store(&self, key: impl Into<String>) -> CartStore<SharedStorage> {
        CartStore::with_key(Arc::clone(&self.inner.storage), key).with_shipping(self.shipping())
    }

    /// Serialize cart mutations.
    ///
    /// Each mutation reads and rewrites a whole record, so two concurrent
    /// requests on one session would otherwise lose an update.
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.inner.writes.lock().await
    }
}
