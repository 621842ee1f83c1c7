//! Menu queries: search, tag filters, grouping and home page picks.

use rust_decimal::Decimal;

use super::models::{Category, Menu, MenuItem, NowBrewing, Review, Special};

/// Tags that promote an item to the home page.
pub const PICK_TAGS: [&str; 2] = ["bestseller", "staffpick"];

/// How many picks the home page shows.
pub const PICK_LIMIT: usize = 3;

/// Search text plus tag filters.
///
/// An item matches when the search text (case-insensitive) appears in its
/// name, description or category, and it carries at least one of the tags.
/// Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuFilter {
    pub search: Option<String>,
    pub tags: Vec<String>,
}

impl MenuFilter {
    /// Filter on `search` text.
    #[must_use]
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    /// Add a tag to the any-of set.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Whether `item` passes the filter.
    #[must_use]
    pub fn matches(&self, item: &MenuItem) -> bool {
        let query = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let text_match = query.is_none_or(|q| {
            [&item.name, &item.description, &item.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&q))
        });
        let tag_match = self.tags.is_empty() || self.tags.iter().any(|t| item.has_tag(t));

        text_match && tag_match
    }
}

/// A category and its matching items.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuSection<'a> {
    pub category: &'a Category,
    pub items: Vec<&'a MenuItem>,
}

impl Menu {
    /// Item with `id`, compared as trimmed text.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&MenuItem> {
        let id = id.trim();
        self.items.iter().find(|item| item.id.trim() == id)
    }

    /// Items passing `filter`, in menu order.
    #[must_use]
    pub fn filtered<'a>(&'a self, filter: &MenuFilter) -> Vec<&'a MenuItem> {
        self.items.iter().filter(|item| filter.matches(item)).collect()
    }

    /// Matching items grouped by category, in category order.
    ///
    /// An item belongs to a category when its `category` equals the
    /// category's id or name. Sections with no matching item are omitted.
    #[must_use]
    pub fn sections<'a>(&'a self, filter: &MenuFilter) -> Vec<MenuSection<'a>> {
        let items = self.filtered(filter);
        self.categories
            .iter()
            .map(|category| MenuSection {
                category,
                items: items
                    .iter()
                    .copied()
                    .filter(|item| item.category == category.id || item.category == category.name)
                    .collect(),
            })
            .filter(|section| !section.items.is_empty())
            .collect()
    }

    /// Up to three bestseller or staff-pick items for the home page.
    #[must_use]
    pub fn featured_picks(&self) -> Vec<Pick<'_>> {
        self.items
            .iter()
            .filter(|item| PICK_TAGS.iter().any(|tag| item.has_tag(tag)))
            .take(PICK_LIMIT)
            .map(|item| Pick {
                item,
                label: if item.has_tag("staffpick") {
                    "Staff Pick"
                } else {
                    "Best Seller"
                }
                .to_string(),
            })
            .collect()
    }

    /// Specials resolved to menu items, up to three. Unknown ids are skipped.
    #[must_use]
    pub fn resolve_specials(&self, specials: &[Special]) -> Vec<Pick<'_>> {
        specials
            .iter()
            .filter_map(|special| {
                let item = self.find(&special.menu_item_id)?;
                Some(Pick {
                    item,
                    label: special.tag.clone().unwrap_or_else(|| "Special".to_string()),
                })
            })
            .take(PICK_LIMIT)
            .collect()
    }

    /// Today's special resolved to its menu item.
    #[must_use]
    pub fn resolve_now_brewing(&self, brewing: &NowBrewing) -> Option<Pick<'_>> {
        let item = self.find(&brewing.menu_item_id)?;
        Some(Pick {
            item,
            label: brewing
                .label
                .clone()
                .unwrap_or_else(|| "Today Only".to_string()),
        })
    }
}

/// A menu item promoted with a display label.
#[derive(Debug, Clone, PartialEq)]
pub struct Pick<'a> {
    pub item: &'a MenuItem,
    pub label: String,
}

impl Review {
    /// Star count: the leading integer of the rating, 5 when missing or
    /// zero, capped at 5.
    #[must_use]
    pub fn stars(&self) -> u8 {
        let digits: String = self
            .rating
            .trim()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        match digits.parse::<u32>() {
            Ok(0) | Err(_) => 5,
            Ok(n) => u8::try_from(n.min(5)).unwrap_or(5),
        }
    }

    /// Numeric rating, 5 when it cannot be read.
    #[must_use]
    pub fn rating_value(&self) -> Decimal {
        let rating = poppin_deli_core::Price::coerce(&self.rating).amount();
        if rating.is_zero() { Decimal::from(5) } else { rating }
    }

    /// Initial shown in the avatar; `G` for anonymous reviews.
    #[must_use]
    pub fn initial(&self) -> char {
        self.name
            .trim()
            .chars()
            .next()
            .map_or('G', |c| c.to_uppercase().next().unwrap_or(c))
    }
}

/// Aggregate over a list of reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSummary {
    pub count: usize,
    /// Mean rating rounded to one decimal place; zero when there are none.
    pub average: Decimal,
}

impl ReviewSummary {
    /// Summarize `reviews`.
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let count = reviews.len();
        if count == 0 {
            return Self {
                count,
                average: Decimal::ZERO,
            };
        }
        let total: Decimal = reviews.iter().map(Review::rating_value).sum();
        let average = (total / Decimal::from(count))
            .round_dp_with_strategy(1, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        Self { count, average }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn menu() -> Menu {
        serde_json::from_value(json!({
            "categories": [
                {"id": "sandwiches", "name": "Sandwiches"},
                {"id": "drinks", "name": "Drinks"},
                {"id": "desserts", "name": "Desserts"}
            ],
            "items": [
                {"id": "1", "name": "Club Sandwich", "category": "sandwiches",
                 "description": "Triple decker", "price": 120, "tags": ["bestseller"]},
                {"id": "2", "name": "Cold Coffee", "category": "drinks",
                 "description": "Creamy", "price": 80, "tags": ["staffpick", "veg"]},
                {"id": "3", "name": "Iced Tea", "category": "Drinks",
                 "description": "Lemon", "price": 60, "tags": ["veg"]},
                {"id": "4", "name": "Paneer Melt", "category": "sandwiches",
                 "description": "Cheesy coffee-free", "price": 140, "tags": ["bestseller"]},
                {"id": "5", "name": "Brownie", "category": "desserts",
                 "description": "", "price": 90, "tags": ["bestseller"]}
            ]
        }))
        .unwrap()
    }

    fn ids(items: &[&MenuItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_over_fields() {
        let menu = menu();
        let filter = MenuFilter::default().search("COFFEE");
        assert_eq!(ids(&menu.filtered(&filter)), vec!["2", "4"]);

        let by_category = MenuFilter::default().search("drinks");
        assert_eq!(ids(&menu.filtered(&by_category)), vec!["2", "3"]);
    }

    #[test]
    fn test_tags_match_any() {
        let menu = menu();
        let filter = MenuFilter::default().tag("staffpick").tag("veg");
        assert_eq!(ids(&menu.filtered(&filter)), vec!["2", "3"]);

        let both = MenuFilter::default().search("tea").tag("veg");
        assert_eq!(ids(&menu.filtered(&both)), vec!["3"]);
    }

    #[test]
    fn test_blank_search_matches_all() {
        let menu = menu();
        assert_eq!(menu.filtered(&MenuFilter::default().search("  ")).len(), 5);
    }

    #[test]
    fn test_sections_match_id_or_name_and_skip_empty() {
        let menu = menu();
        let sections = menu.sections(&MenuFilter::default().tag("veg"));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].category.id, "drinks");
        assert_eq!(ids(&sections[0].items), vec!["2", "3"]);
    }

    #[test]
    fn test_featured_picks() {
        let menu = menu();
        let picks = menu.featured_picks();
        let labels: Vec<_> = picks.iter().map(|p| (p.item.id.as_str(), p.label.as_str())).collect();
        assert_eq!(
            labels,
            vec![("1", "Best Seller"), ("2", "Staff Pick"), ("4", "Best Seller")]
        );
    }

    #[test]
    fn test_resolve_specials_skips_unknown() {
        let menu = menu();
        let specials: Vec<Special> = serde_json::from_value(json!([
            {"menu_item_id": 99, "active": true},
            {"menu_item_id": 3, "tag": "Summer", "active": true},
            {"menu_item_id": "5", "active": true}
        ]))
        .unwrap();
        let picks = menu.resolve_specials(&specials);
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].label, "Summer");
        assert_eq!(picks[1].label, "Special");
    }

    #[test]
    fn test_resolve_now_brewing() {
        let menu = menu();
        let brewing = NowBrewing {
            menu_item_id: "2".to_string(),
            label: None,
            active: true,
        };
        let pick = menu.resolve_now_brewing(&brewing).unwrap();
        assert_eq!(pick.item.name, "Cold Coffee");
        assert_eq!(pick.label, "Today Only");

        let missing = NowBrewing {
            menu_item_id: "x".to_string(),
            ..brewing
        };
        assert!(menu.resolve_now_brewing(&missing).is_none());
    }

    #[test]
    fn test_review_stars_and_summary() {
        let reviews: Vec<Review> = serde_json::from_value(json!([
            {"name": "riya", "rating": 4, "text": "Great"},
            {"name": "", "rating": "", "text": "Nice"},
            {"name": "Sam", "rating": "9", "text": "Wow"}
        ]))
        .unwrap();

        assert_eq!(reviews[0].stars(), 4);
        assert_eq!(reviews[1].stars(), 5);
        assert_eq!(reviews[2].stars(), 5);
        assert_eq!(reviews[0].initial(), 'R');
        assert_eq!(reviews[1].initial(), 'G');

        let summary = ReviewSummary::from_reviews(&reviews);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, Decimal::new(60, 1));

        assert_eq!(ReviewSummary::from_reviews(&[]).average, Decimal::ZERO);
    }
}
