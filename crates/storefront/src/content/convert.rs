//! Sheet rows to content models.
//!
//! Each function returns `None` when the rows carry nothing usable, which
//! sends the caller on to the fallback data.

use std::collections::BTreeMap;

use serde_json::Value;

use super::models::{
    Category, DEFAULT_SORT_ORDER, FeaturedItem, GalleryImage, Menu, MenuItem, NowBrewing, Pillar,
    Review, SiteSettings, Special, Status, VibeStatus, default_featured_tag, default_gallery_type,
};
use crate::sheets::{SheetRow, value_to_int};

/// Collapse `key`/`value` rows into a map. Rows without a key are skipped.
fn key_values(rows: &[SheetRow]) -> BTreeMap<String, String> {
    rows.iter()
        .filter_map(|row| {
            let key = row.opt_text("key")?;
            Some((key.trim().to_string(), row.text("value")))
        })
        .collect()
}

/// Status sheet: `key`/`value` rows with `vibe_status`, `vibe_label`,
/// `vibe_subtext`, `vibe_suggestion` and `wait_time` keys.
pub fn status(rows: &[SheetRow]) -> Option<Status> {
    if rows.is_empty() {
        return None;
    }
    let values = key_values(rows);
    let text = |key: &str| values.get(key).filter(|v| !v.trim().is_empty()).cloned();

    let subtext = text("vibe_subtext").unwrap_or_default();
    let wait_time = values
        .get("wait_time")
        .and_then(|w| value_to_int(&Value::String(w.clone())))
        .unwrap_or(0);

    Some(Status {
        status: text("vibe_status").map(VibeStatus::from).unwrap_or_default(),
        label: text("vibe_label").unwrap_or_else(|| Status::default().label),
        suggestion: text("vibe_suggestion").unwrap_or_else(|| subtext.clone()),
        note: subtext,
        wait_time,
    })
}

/// Lowercase the category name and replace whitespace runs with `-`.
#[must_use]
pub fn category_slug(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Menu sheet: available items sorted by `sortOrder`, categories in
/// first-seen order.
pub fn menu(rows: &[SheetRow]) -> Option<Menu> {
    if rows.is_empty() {
        return None;
    }

    let mut items: Vec<MenuItem> = rows
        .iter()
        .filter(|row| row.flag("isAvailable") != Some(false))
        .map(|row| MenuItem {
            id: row.text("id"),
            name: row.text("name"),
            category: row.text("category"),
            description: row.text("description"),
            price: row.price("price"),
            is_veg: row.flag("isVeg").unwrap_or(false),
            tags: row.list("tags"),
            image_url: row.opt_text("imageUrl"),
            sort_order: row.int_or("sortOrder", DEFAULT_SORT_ORDER),
        })
        .collect();
    items.sort_by_key(|item| item.sort_order);

    let mut categories: Vec<Category> = Vec::new();
    for item in &items {
        if !categories.iter().any(|c| c.name == item.category) {
            categories.push(Category {
                id: category_slug(&item.category),
                name: item.category.clone(),
                description: String::new(),
            });
        }
    }

    Some(Menu { categories, items })
}

/// Featured sheet, sorted by `sortOrder`.
pub fn featured(rows: &[SheetRow]) -> Option<Vec<FeaturedItem>> {
    if rows.is_empty() {
        return None;
    }
    let mut items: Vec<FeaturedItem> = rows
        .iter()
        .map(|row| FeaturedItem {
            id: row.text("id"),
            menu_item_id: row.text("menuItemId"),
            title_override: row.opt_text("titleOverride"),
            tag: row.opt_text("tag").unwrap_or_else(default_featured_tag),
            sort_order: row.int_or("sortOrder", DEFAULT_SORT_ORDER),
        })
        .collect();
    items.sort_by_key(|item| item.sort_order);
    Some(items)
}

/// Gallery sheet: active images sorted by `sortOrder`.
pub fn gallery(rows: &[SheetRow]) -> Option<Vec<GalleryImage>> {
    if rows.is_empty() {
        return None;
    }
    let mut images: Vec<GalleryImage> = rows
        .iter()
        .filter(|row| row.flag("isActive") != Some(false))
        .map(|row| GalleryImage {
            id: row.text("id"),
            image_url: row.text("imageUrl"),
            kind: row.opt_text("type").unwrap_or_else(default_gallery_type),
            caption: row.text("caption"),
            sort_order: row.int_or("sortOrder", DEFAULT_SORT_ORDER),
        })
        .collect();
    images.sort_by_key(|image| image.sort_order);
    Some(images)
}

/// Site sheet: `key`/`value` rows.
pub fn site_settings(rows: &[SheetRow]) -> Option<SiteSettings> {
    if rows.is_empty() {
        return None;
    }
    Some(key_values(rows).into_iter().collect())
}

/// Specials sheet: rows marked active.
pub fn specials(rows: &[SheetRow]) -> Option<Vec<Special>> {
    if rows.is_empty() {
        return None;
    }
    Some(
        rows.iter()
            .filter(|row| row.flag("active") == Some(true))
            .map(|row| Special {
                menu_item_id: row.text("menu_item_id"),
                tag: row.opt_text("tag"),
                active: true,
            })
            .collect(),
    )
}

/// Reviews sheet, as entered.
pub fn reviews(rows: &[SheetRow]) -> Option<Vec<Review>> {
    if rows.is_empty() {
        return None;
    }
    Some(
        rows.iter()
            .map(|row| Review {
                name: row.text("name"),
                rating: row.text("rating"),
                text: row.text("text"),
            })
            .collect(),
    )
}

/// Now-brewing sheet: the first active row.
pub fn now_brewing(rows: &[SheetRow]) -> Option<NowBrewing> {
    rows.iter()
        .find(|row| row.flag("active") == Some(true))
        .map(|row| NowBrewing {
            menu_item_id: row.text("menu_item_id"),
            label: row.opt_text("label"),
            active: true,
        })
}

/// Pillars sheet, as entered.
pub fn pillars(rows: &[SheetRow]) -> Option<Vec<Pillar>> {
    if rows.is_empty() {
        return None;
    }
    Some(
        rows.iter()
            .map(|row| Pillar {
                icon: row.text("icon"),
                title: row.text("title"),
                description: row.text("description"),
            })
            .collect(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rows(value: Value) -> Vec<SheetRow> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_status_from_key_values() {
        let status = status(&rows(json!([
            {"key": "vibe_status", "value": "yellow"},
            {"key": "vibe_label", "value": "Getting Busy"},
            {"key": "vibe_subtext", "value": "Order ahead"},
            {"key": "wait_time", "value": 15.0},
            {"key": "", "value": "ignored"}
        ])))
        .unwrap();

        assert_eq!(status.status, VibeStatus::Yellow);
        assert_eq!(status.label, "Getting Busy");
        assert_eq!(status.note, "Order ahead");
        assert_eq!(status.suggestion, "Order ahead");
        assert_eq!(status.wait_time, 15);
    }

    #[test]
    fn test_status_defaults_for_missing_keys() {
        let status = status(&rows(json!([{"key": "other", "value": "x"}]))).unwrap();
        assert_eq!(status, Status::default());
        assert!(super::status(&[]).is_none());
    }

    #[test]
    fn test_menu_filters_sorts_and_groups() {
        let menu = menu(&rows(json!([
            {"id": "m1", "name": "Club Sandwich", "category": "Hot Sandwiches", "price": 120,
             "isAvailable": "TRUE", "isVeg": "FALSE", "tags": "bestseller", "sortOrder": 2},
            {"id": "m2", "name": "Cold Coffee", "category": "Drinks", "price": "80",
             "isAvailable": true, "isVeg": true, "tags": "", "sortOrder": 1},
            {"id": "m3", "name": "Sold Out", "category": "Drinks", "price": 50,
             "isAvailable": "FALSE"},
            {"id": "m4", "name": "Fries", "category": "Hot Sandwiches", "price": "n/a",
             "sortOrder": "later"}
        ])))
        .unwrap();

        let ids: Vec<_> = menu.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m1", "m4"]);
        assert_eq!(menu.items[2].sort_order, DEFAULT_SORT_ORDER);
        assert_eq!(menu.items[2].price.to_string(), "₹0");
        assert!(menu.items[0].is_veg);
        assert!(menu.items[0].tags.is_empty());

        let cats: Vec<_> = menu.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(cats, vec!["drinks", "hot-sandwiches"]);
        assert_eq!(menu.categories[1].name, "Hot Sandwiches");
    }

    #[test]
    fn test_category_slug() {
        assert_eq!(category_slug("Hot  Sandwiches"), "hot-sandwiches");
        assert_eq!(category_slug("Drinks"), "drinks");
    }

    #[test]
    fn test_featured_defaults() {
        let items = featured(&rows(json!([
            {"id": 1, "menuItemId": "m1", "sortOrder": 3},
            {"id": 2, "menuItemId": "m2", "tag": "New", "titleOverride": "The Club", "sortOrder": 1}
        ])))
        .unwrap();
        assert_eq!(items[0].id, "2");
        assert_eq!(items[0].title_override.as_deref(), Some("The Club"));
        assert_eq!(items[1].tag, "Featured");
    }

    #[test]
    fn test_gallery_skips_inactive() {
        let images = gallery(&rows(json!([
            {"id": "g1", "imageUrl": "a.jpg", "isActive": "FALSE"},
            {"id": "g2", "imageUrl": "b.jpg", "type": "interior"},
            {"id": "g3", "imageUrl": "c.jpg"}
        ])))
        .unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].kind, "interior");
        assert_eq!(images[1].kind, "general");
    }

    #[test]
    fn test_specials_only_active() {
        let specials = specials(&rows(json!([
            {"menu_item_id": 3, "tag": "Chef's Pick", "active": "TRUE"},
            {"menu_item_id": 4, "active": "FALSE"}
        ])))
        .unwrap();
        assert_eq!(specials.len(), 1);
        assert_eq!(specials[0].menu_item_id, "3");
    }

    #[test]
    fn test_now_brewing_first_active() {
        let brewing = now_brewing(&rows(json!([
            {"menu_item_id": "m1", "active": "FALSE"},
            {"menu_item_id": "m2", "label": "Today Only", "active": "TRUE"},
            {"menu_item_id": "m3", "active": "TRUE"}
        ])))
        .unwrap();
        assert_eq!(brewing.menu_item_id, "m2");
        assert!(now_brewing(&rows(json!([{"menu_item_id": "m1"}]))).is_none());
    }

    #[test]
    fn test_site_settings_from_key_values() {
        let settings = site_settings(&rows(json!([
            {"key": "loyalty_text", "value": "10th coffee free"},
            {"key": "whatsapp_number", "value": 911234567890_i64}
        ])))
        .unwrap();
        assert_eq!(settings.get("loyalty_text"), Some("10th coffee free"));
        assert_eq!(settings.whatsapp_number(), "911234567890");
    }
}
