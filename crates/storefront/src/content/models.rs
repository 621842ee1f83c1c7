//! Content types served by the site.
//!
//! These are both the cached form of a feed and the shape of the bundled
//! fallback files, so deserialization is lenient: ids may be numbers, flags
//! may be `"TRUE"` text, and missing optional fields take defaults.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use poppin_deli_core::Price;
use poppin_deli_core::cart::Product;
use poppin_deli_core::order::DEFAULT_WHATSAPP_NUMBER;

use crate::sheets::{value_to_flag, value_to_int, value_to_text};

/// Sort position given to rows without a usable `sortOrder`.
pub const DEFAULT_SORT_ORDER: i64 = 999;

// =============================================================================
// Status
// =============================================================================

/// Traffic-light crowd indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VibeStatus {
    #[default]
    Green,
    Yellow,
    Red,
}

impl VibeStatus {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl From<String> for VibeStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "yellow" => Self::Yellow,
            "red" => Self::Red,
            _ => Self::Green,
        }
    }
}

impl From<VibeStatus> for String {
    fn from(value: VibeStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for VibeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live shop status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default)]
    pub status: VibeStatus,
    #[serde(default = "default_status_label")]
    pub label: String,
    #[serde(default, deserialize_with = "de_text")]
    pub note: String,
    /// Expected wait in minutes.
    #[serde(default, deserialize_with = "de_int")]
    pub wait_time: i64,
    #[serde(default, deserialize_with = "de_text")]
    pub suggestion: String,
}

fn default_status_label() -> String {
    "Open Now".to_string()
}

impl Default for Status {
    fn default() -> Self {
        Self {
            status: VibeStatus::Green,
            label: default_status_label(),
            note: String::new(),
            wait_time: 0,
            suggestion: String::new(),
        }
    }
}

// =============================================================================
// Menu
// =============================================================================

/// The full menu: categories in display order and the items in them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A menu section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "de_text")]
    pub id: String,
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub description: String,
}

/// One orderable dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(deserialize_with = "de_text")]
    pub id: String,
    #[serde(deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub category: String,
    #[serde(default, deserialize_with = "de_text")]
    pub description: String,
    #[serde(default, deserialize_with = "de_price")]
    pub price: Price,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_veg: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub image_url: Option<String>,
    #[serde(default = "default_sort_order", deserialize_with = "de_sort_order")]
    pub sort_order: i64,
}

impl MenuItem {
    /// Whether the item carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// The product handed to the cart when this item is added.
    #[must_use]
    pub fn to_product(&self) -> Product {
        Product::new(
            self.id.as_str(),
            self.name.clone(),
            self.price,
            self.category.clone(),
        )
    }
}

// =============================================================================
// Featured and gallery
// =============================================================================

/// A hand-picked home page item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedItem {
    #[serde(deserialize_with = "de_text")]
    pub id: String,
    #[serde(default, deserialize_with = "de_text")]
    pub menu_item_id: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub title_override: Option<String>,
    #[serde(default = "default_featured_tag")]
    pub tag: String,
    #[serde(default = "default_sort_order", deserialize_with = "de_sort_order")]
    pub sort_order: i64,
}

pub(crate) fn default_featured_tag() -> String {
    "Featured".to_string()
}

/// A gallery photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    #[serde(deserialize_with = "de_text")]
    pub id: String,
    #[serde(default, deserialize_with = "de_text")]
    pub image_url: String,
    #[serde(
        rename = "type",
        default = "default_gallery_type",
        deserialize_with = "de_text"
    )]
    pub kind: String,
    #[serde(default, deserialize_with = "de_text")]
    pub caption: String,
    #[serde(default = "default_sort_order", deserialize_with = "de_sort_order")]
    pub sort_order: i64,
}

pub(crate) fn default_gallery_type() -> String {
    "general".to_string()
}

// =============================================================================
// Site settings
// =============================================================================

/// Free-form `key -> value` site settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteSettings(BTreeMap<String, String>);

impl SiteSettings {
    /// Setting value, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number orders are sent to.
    #[must_use]
    pub fn whatsapp_number(&self) -> &str {
        self.get("whatsapp_number")
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(DEFAULT_WHATSAPP_NUMBER)
    }

    /// Iterate over all settings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        [
            ("phone_primary", "+91 87707 69691"),
            ("address", "E-2/265, Arera Colony, Bhopal"),
            ("open_time", "11:00"),
            ("close_time", "23:00"),
            ("whatsapp_number", DEFAULT_WHATSAPP_NUMBER),
        ]
        .into_iter()
        .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SiteSettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// =============================================================================
// Specials, reviews, now brewing, pillars
// =============================================================================

/// A signature pick pointing at a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Special {
    #[serde(default, deserialize_with = "de_text")]
    pub menu_item_id: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "de_flag")]
    pub active: bool,
}

/// A customer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    /// Rating as entered; read through [`Review::stars`].
    #[serde(default, deserialize_with = "de_text")]
    pub rating: String,
    #[serde(default, deserialize_with = "de_text")]
    pub text: String,
}

/// Today's special.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowBrewing {
    #[serde(default, deserialize_with = "de_text")]
    pub menu_item_id: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "de_flag")]
    pub active: bool,
}

/// A brand pillar shown on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pillar {
    #[serde(default, deserialize_with = "de_text")]
    pub icon: String,
    #[serde(default, deserialize_with = "de_text")]
    pub title: String,
    #[serde(default, deserialize_with = "de_text")]
    pub description: String,
}

// =============================================================================
// Lenient field decoders
// =============================================================================

const fn default_sort_order() -> i64 {
    DEFAULT_SORT_ORDER
}

fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(|v| value_to_text(&v))
}

fn de_opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let text = de_text(deserializer)?;
    Ok(if text.trim().is_empty() { None } else { Some(text) })
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Value::deserialize(deserializer).map(|v| value_to_flag(&v).unwrap_or(false))
}

fn de_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Value::deserialize(deserializer).map(|v| value_to_int(&v).unwrap_or(0))
}

fn de_sort_order<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Value::deserialize(deserializer).map(|v| value_to_int(&v).unwrap_or(DEFAULT_SORT_ORDER))
}

fn de_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Price, D::Error> {
    Value::deserialize(deserializer).map(|v| Price::coerce(&value_to_text(&v)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_menu_item_lenient_fields() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": 7,
            "name": "Masala Fries",
            "category": "sides",
            "price": "89",
            "isVeg": "TRUE",
            "tags": ["bestseller"],
            "imageUrl": ""
        }))
        .unwrap();

        assert_eq!(item.id, "7");
        assert_eq!(item.price.to_string(), "₹89");
        assert!(item.is_veg);
        assert_eq!(item.image_url, None);
        assert_eq!(item.sort_order, DEFAULT_SORT_ORDER);
        assert!(item.has_tag("bestseller"));
    }

    #[test]
    fn test_menu_item_round_trips_through_cache_form() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": "m1", "name": "Club Sandwich", "price": 120.5, "sortOrder": 2
        }))
        .unwrap();
        let cached = serde_json::to_value(&item).unwrap();
        let back: MenuItem = serde_json::from_value(cached).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_to_product() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": "m1", "name": "Club Sandwich", "category": "sandwiches", "price": 120
        }))
        .unwrap();
        let product = item.to_product();
        assert_eq!(product.id.as_str(), "m1");
        assert_eq!(product.price.to_string(), "₹120");
        assert_eq!(product.category, "sandwiches");
    }

    #[test]
    fn test_status_defaults_and_unknown_vibe() {
        let status: Status = serde_json::from_value(json!({"status": "purple"})).unwrap();
        assert_eq!(status.status, VibeStatus::Green);
        assert_eq!(status.label, "Open Now");
        assert_eq!(status.wait_time, 0);

        let busy: Status =
            serde_json::from_value(json!({"status": "RED", "label": "Packed", "waitTime": "25"}))
                .unwrap();
        assert_eq!(busy.status, VibeStatus::Red);
        assert_eq!(busy.wait_time, 25);
    }

    #[test]
    fn test_site_settings_default() {
        let settings = SiteSettings::default();
        assert_eq!(settings.whatsapp_number(), "918770769691");
        assert_eq!(settings.get("open_time"), Some("11:00"));
        assert_eq!(settings.get("loyalty_text"), None);
    }

    #[test]
    fn test_special_active_flag() {
        let specials: Vec<Special> = serde_json::from_value(json!([
            {"menu_item_id": 3, "tag": "Chef's Pick", "active": true},
            {"menu_item_id": "4", "active": "FALSE"}
        ]))
        .unwrap();
        assert_eq!(specials[0].menu_item_id, "3");
        assert!(specials[0].active);
        assert!(!specials[1].active);
        assert_eq!(specials[1].tag, None);
    }
}
