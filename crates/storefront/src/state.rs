//! Application state shared across commands.

use std::sync::Arc;

use poppin_deli_core::cart::CartStore;
use poppin_deli_core::order::OrderFormatter;

use crate::config::SiteConfig;
use crate::content::{ContentService, FallbackData, FeedCache};
use crate::error::Result;
use crate::sheets::SheetsClient;
use crate::storage::{FileStore, SharedStore};

/// Application state.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, content service, storage and order formatter.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    content: ContentService,
    store: SharedStore,
    formatter: OrderFormatter,
}

impl AppState {
    /// Create application state with a file store in the configured
    /// storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created or the
    /// HTTP client cannot be built.
    pub fn new(config: SiteConfig) -> Result<Self> {
        let store = FileStore::open(&config.storage_dir)?.shared();
        Self::with_store(config, store)
    }

    /// Create application state over an existing store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_store(config: SiteConfig, store: SharedStore) -> Result<Self> {
        let sheets = SheetsClient::new(&config.sheets)?;
        let cache = FeedCache::new(store.clone(), config.cache_ttl);
        let fallback = FallbackData::new(&config.data_dir);
        let content = ContentService::new(sheets, cache, fallback);
        let formatter = OrderFormatter::new(config.order.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                content,
                store,
                formatter,
            }),
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the content service.
    #[must_use]
    pub fn content(&self) -> &ContentService {
        &self.inner.content
    }

    /// Get a reference to the shared key-value store.
    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.inner.store
    }

    /// Get a reference to the order formatter.
    #[must_use]
    pub fn formatter(&self) -> &OrderFormatter {
        &self.inner.formatter
    }

    /// A cart store over the shared storage, restored from its slot.
    #[must_use]
    pub fn cart_store(&self) -> CartStore<SharedStore> {
        let mut cart = CartStore::with_config(self.inner.store.clone(), self.inner.config.cart());
        cart.load();
        cart
    }
}
