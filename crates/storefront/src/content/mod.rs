//! Site content backed by the spreadsheet feed.
//!
//! Every getter resolves in the same order:
//!
//! 1. a fresh [`FeedCache`] record
//! 2. the live sheet, converted and written back to the cache
//! 3. the bundled fallback file, if the content type has one
//! 4. a built-in default
//!
//! Feed and fallback failures are logged and never returned to the caller.

pub mod cache;
mod convert;
pub mod fallback;
pub mod menu;
pub mod models;

pub use cache::{CacheRecord, FeedCache};
pub use convert::category_slug;
pub use fallback::{FallbackData, FallbackError};
pub use menu::{MenuFilter, MenuSection, Pick, ReviewSummary};
pub use models::{
    Category, FeaturedItem, GalleryImage, Menu, MenuItem, NowBrewing, Pillar, Review,
    SiteSettings, Special, Status, VibeStatus,
};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::sheets::{SheetKind, SheetRow, SheetsClient, SheetsError};

/// Reads site content through cache, feed and fallback.
#[derive(Clone)]
pub struct ContentService {
    sheets: SheetsClient,
    cache: FeedCache,
    fallback: FallbackData,
}

impl ContentService {
    /// Create a content service.
    #[must_use]
    pub const fn new(sheets: SheetsClient, cache: FeedCache, fallback: FallbackData) -> Self {
        Self {
            sheets,
            cache,
            fallback,
        }
    }

    /// The feed cache.
    #[must_use]
    pub const fn cache(&self) -> &FeedCache {
        &self.cache
    }

    /// Whether the core sheets (status and menu) are configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.sheets.sheet_id(SheetKind::Status).is_some()
            && self.sheets.sheet_id(SheetKind::Menu).is_some()
    }

    /// Live shop status.
    #[instrument(skip(self))]
    pub async fn status(&self) -> Status {
        if let Some(status) = self.from_feed(SheetKind::Status, convert::status).await {
            return status;
        }
        self.from_fallback(SheetKind::Status).await.unwrap_or_default()
    }

    /// The menu. Unavailable items are already removed.
    #[instrument(skip(self))]
    pub async fn menu(&self) -> Menu {
        if let Some(menu) = self.from_feed(SheetKind::Menu, convert::menu).await {
            return menu;
        }
        self.from_fallback(SheetKind::Menu).await.unwrap_or_default()
    }

    /// Hand-picked featured items, or `None` when the sheet has none.
    #[instrument(skip(self))]
    pub async fn featured(&self) -> Option<Vec<FeaturedItem>> {
        self.from_feed(SheetKind::Featured, convert::featured).await
    }

    /// Active gallery images, optionally limited to one `type`.
    #[instrument(skip(self))]
    pub async fn gallery(&self, kind: Option<&str>) -> Vec<GalleryImage> {
        let images = self
            .from_feed(SheetKind::Gallery, convert::gallery)
            .await
            .unwrap_or_default();
        match kind {
            Some(kind) => images.into_iter().filter(|img| img.kind == kind).collect(),
            None => images,
        }
    }

    /// Site settings.
    #[instrument(skip(self))]
    pub async fn site_settings(&self) -> SiteSettings {
        self.from_feed(SheetKind::Site, convert::site_settings)
            .await
            .unwrap_or_default()
    }

    /// Active signature picks.
    #[instrument(skip(self))]
    pub async fn specials(&self) -> Vec<Special> {
        if let Some(specials) = self.from_feed(SheetKind::Specials, convert::specials).await {
            return specials;
        }
        self.from_fallback::<Vec<Special>>(SheetKind::Specials)
            .await
            .map(|all| all.into_iter().filter(|s| s.active).collect())
            .unwrap_or_default()
    }

    /// Customer reviews.
    #[instrument(skip(self))]
    pub async fn reviews(&self) -> Vec<Review> {
        if let Some(reviews) = self.from_feed(SheetKind::Reviews, convert::reviews).await {
            return reviews;
        }
        self.from_fallback(SheetKind::Reviews).await.unwrap_or_default()
    }

    /// Today's special, if one is active.
    ///
    /// The fallback file may hold a single object or a list; from a list the
    /// first active entry is used.
    #[instrument(skip(self))]
    pub async fn now_brewing(&self) -> Option<NowBrewing> {
        if let Some(brewing) = self.from_feed(SheetKind::NowBrewing, convert::now_brewing).await {
            return Some(brewing);
        }
        match self.from_fallback::<Value>(SheetKind::NowBrewing).await? {
            Value::Array(entries) => entries
                .into_iter()
                .filter_map(|entry| serde_json::from_value::<NowBrewing>(entry).ok())
                .find(|entry| entry.active),
            Value::Null => None,
            object => serde_json::from_value(object)
                .inspect_err(|e| warn!(error = %e, "Now-brewing fallback has unexpected shape"))
                .ok(),
        }
    }

    /// Brand pillars.
    #[instrument(skip(self))]
    pub async fn pillars(&self) -> Vec<Pillar> {
        if let Some(pillars) = self.from_feed(SheetKind::Pillars, convert::pillars).await {
            return pillars;
        }
        self.from_fallback(SheetKind::Pillars).await.unwrap_or_default()
    }

    /// Drop every cached feed.
    pub async fn clear_cache(&self) {
        self.cache.clear_all().await;
        info!("All Poppin Deli caches cleared");
    }

    /// Cache, then live sheet. Converted sheet data is written to the cache.
    async fn from_feed<T, F>(&self, kind: SheetKind, convert: F) -> Option<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&[SheetRow]) -> Option<T>,
    {
        if let Some(cached) = self.cache.get::<T>(kind).await {
            return Some(cached);
        }

        let rows = match self.sheets.fetch_rows(kind).await {
            Ok(rows) => rows,
            Err(SheetsError::NotConfigured(_)) => {
                debug!(%kind, "Sheet not configured");
                return None;
            }
            Err(e) => {
                warn!(%kind, error = %e, "Failed to fetch sheet");
                return None;
            }
        };

        let Some(data) = convert(&rows) else {
            debug!(%kind, rows = rows.len(), "Sheet has no usable rows");
            return None;
        };
        self.cache.put(kind, &data).await;
        Some(data)
    }

    async fn from_fallback<T: DeserializeOwned>(&self, kind: SheetKind) -> Option<T> {
        match self.fallback.load(kind).await {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(%kind, error = %e, "Fallback data unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use poppin_deli_core::storage::MemoryStore;
    use serde_json::json;

    use super::*;
    use crate::config::SheetsConfig;

    /// Service whose sheets point at a closed local port.
    fn offline_service(store: &Arc<MemoryStore>) -> ContentService {
        let config = SheetsConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..SheetsConfig::default()
        };
        ContentService::new(
            SheetsClient::new(&config).unwrap(),
            FeedCache::new(store.clone(), Duration::from_secs(60)),
            FallbackData::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data")),
        )
    }

    #[test]
    fn test_is_configured_needs_status_and_menu() {
        let store = Arc::new(MemoryStore::new());
        assert!(offline_service(&store).is_configured());

        let mut config = SheetsConfig::default();
        config.sheet_ids.insert(SheetKind::Menu, "  ".to_string());
        let service = ContentService::new(
            SheetsClient::new(&config).unwrap(),
            FeedCache::new(store, Duration::from_secs(60)),
            FallbackData::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data")),
        );
        assert!(!service.is_configured());
    }

    #[tokio::test]
    async fn test_unreachable_feed_uses_fallback() {
        let store = Arc::new(MemoryStore::new());
        let service = offline_service(&store);

        let menu = service.menu().await;
        assert!(!menu.items.is_empty());
        assert!(!menu.categories.is_empty());

        let specials = service.specials().await;
        assert!(specials.iter().all(|s| s.active));

        // Fallback data is never cached.
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_defaults_without_fallback() {
        let store = Arc::new(MemoryStore::new());
        let service = offline_service(&store);

        assert!(service.featured().await.is_none());
        assert!(service.gallery(None).await.is_empty());
        assert_eq!(service.site_settings().await, SiteSettings::default());
    }

    #[tokio::test]
    async fn test_fresh_cache_wins() {
        let store = Arc::new(MemoryStore::new());
        let service = offline_service(&store);
        service
            .cache()
            .put(
                SheetKind::Status,
                &json!({"status": "red", "label": "Packed", "waitTime": 30}),
            )
            .await;

        let status = service.status().await;
        assert_eq!(status.status, VibeStatus::Red);
        assert_eq!(status.wait_time, 30);

        service.clear_cache().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_gallery_type_filter_over_cache() {
        let store = Arc::new(MemoryStore::new());
        let service = offline_service(&store);
        service
            .cache()
            .put(
                SheetKind::Gallery,
                &json!([
                    {"id": "g1", "imageUrl": "a.jpg", "type": "food"},
                    {"id": "g2", "imageUrl": "b.jpg", "type": "interior"}
                ]),
            )
            .await;

        let food = service.gallery(Some("food")).await;
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].id, "g1");
        assert_eq!(service.gallery(None).await.len(), 2);
    }

    #[tokio::test]
    async fn test_now_brewing_fallback() {
        let store = Arc::new(MemoryStore::new());
        let service = offline_service(&store);
        let brewing = service.now_brewing().await.unwrap();
        assert!(brewing.active);
        assert!(!brewing.menu_item_id.is_empty());
    }
}
