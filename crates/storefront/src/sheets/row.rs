//! A single spreadsheet row keyed by column header.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use poppin_deli_core::Price;

/// Header-to-value map for one row.
///
/// Cell values keep their JSON type (text, number, boolean). Missing and
/// null cells are stored as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetRow(BTreeMap<String, Value>);

impl SheetRow {
    /// An empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell.
    pub fn insert(&mut self, header: impl Into<String>, value: Value) {
        self.0.insert(header.into(), value);
    }

    /// Raw cell value.
    #[must_use]
    pub fn get(&self, header: &str) -> Option<&Value> {
        self.0.get(header)
    }

    /// Whether the row has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cell rendered as text; empty when missing.
    ///
    /// Whole numbers render without a fractional part, so a numeric id of
    /// `3.0` reads as `"3"`.
    #[must_use]
    pub fn text(&self, header: &str) -> String {
        self.get(header).map(value_to_text).unwrap_or_default()
    }

    /// Cell rendered as text, or `None` when missing or blank.
    #[must_use]
    pub fn opt_text(&self, header: &str) -> Option<String> {
        let text = self.text(header);
        if text.trim().is_empty() { None } else { Some(text) }
    }

    /// Boolean cell: a JSON boolean or the text `TRUE`/`FALSE` in any case.
    #[must_use]
    pub fn flag(&self, header: &str) -> Option<bool> {
        self.get(header).and_then(value_to_flag)
    }

    /// Leading integer of the cell, or `default` when there is none.
    #[must_use]
    pub fn int_or(&self, header: &str, default: i64) -> i64 {
        self.get(header).and_then(value_to_int).unwrap_or(default)
    }

    /// Cell as a price; unparsable values are zero.
    #[must_use]
    pub fn price(&self, header: &str) -> Price {
        Price::coerce(&self.text(header))
    }

    /// Comma-separated cell split into trimmed, non-empty parts.
    #[must_use]
    pub fn list(&self, header: &str) -> Vec<String> {
        self.text(header)
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl FromIterator<(String, Value)> for SheetRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Render a JSON cell the way a spreadsheet shows it.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Value::Number(n) => n
            .as_i64()
            .map(|i| i.to_string())
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .and_then(truncate_f64)
                    .map(|i| i.to_string())
            })
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

/// Read a boolean cell: a JSON boolean or `TRUE`/`FALSE` text.
pub(crate) fn value_to_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Read the leading integer of a cell.
pub(crate) fn value_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate_f64)),
        Value::String(s) => leading_int(s),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)] // Range is checked before the cast
fn truncate_f64(value: f64) -> Option<i64> {
    #[allow(clippy::cast_precision_loss)] // Bounds only need to be approximate
    let in_range = value.is_finite() && value.abs() < i64::MAX as f64;
    in_range.then(|| value.trunc() as i64)
}

fn leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed.get(..end)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: Value) -> SheetRow {
        serde_json::from_value(value).unwrap_or_default()
    }

    #[test]
    fn test_text_renders_whole_numbers_without_fraction() {
        let r = row(json!({"id": 3.0, "price": 99.5, "name": "Fries", "on": true}));
        assert_eq!(r.text("id"), "3");
        assert_eq!(r.text("price"), "99.5");
        assert_eq!(r.text("name"), "Fries");
        assert_eq!(r.text("on"), "TRUE");
        assert_eq!(r.text("missing"), "");
    }

    #[test]
    fn test_opt_text_blank_is_none() {
        let r = row(json!({"imageUrl": "  ", "tag": "New"}));
        assert_eq!(r.opt_text("imageUrl"), None);
        assert_eq!(r.opt_text("tag").as_deref(), Some("New"));
    }

    #[test]
    fn test_flag() {
        let r = row(json!({"a": "TRUE", "b": false, "c": "False", "d": "yes"}));
        assert_eq!(r.flag("a"), Some(true));
        assert_eq!(r.flag("b"), Some(false));
        assert_eq!(r.flag("c"), Some(false));
        assert_eq!(r.flag("d"), None);
        assert_eq!(r.flag("e"), None);
    }

    #[test]
    fn test_int_or() {
        let r = row(json!({"a": "12 min", "b": 4.0, "c": "soon", "d": -3}));
        assert_eq!(r.int_or("a", 0), 12);
        assert_eq!(r.int_or("b", 0), 4);
        assert_eq!(r.int_or("c", 999), 999);
        assert_eq!(r.int_or("d", 0), -3);
        assert_eq!(r.int_or("missing", 7), 7);
    }

    #[test]
    fn test_list_splits_and_trims() {
        let r = row(json!({"tags": "bestseller, veg ,, spicy"}));
        assert_eq!(r.list("tags"), vec!["bestseller", "veg", "spicy"]);
        assert!(r.list("missing").is_empty());
    }

    #[test]
    fn test_price() {
        let r = row(json!({"price": 120.0, "bad": "ask"}));
        assert_eq!(r.price("price").to_string(), "₹120");
        assert_eq!(r.price("bad"), Price::ZERO);
    }
}
