//! The cart record and its persisted form.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::billing::BillingSummary;
use super::line::{CartLine, Product};
use crate::types::{ProductId, TaxPercent};

/// Reasons a persisted cart record is rejected.
#[derive(Debug, Error)]
pub enum CartParseError {
    /// Not JSON, or JSON of the wrong shape (including negative amounts).
    #[error("invalid cart JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A line was stored with quantity zero.
    #[error("line {0} has zero quantity")]
    ZeroQuantity(ProductId),

    /// Two lines share an id.
    #[error("duplicate line id {0}")]
    DuplicateId(ProductId),
}

/// Authoritative list of selected items plus the tax rate.
///
/// Lines keep insertion order, which is also display order. Ids are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartState {
    #[serde(rename = "items")]
    lines: Vec<CartLine>,
    #[serde(rename = "gstPercent")]
    tax_percent: TaxPercent,
}

/// Persisted record as read; absent fields are filled in by the caller.
#[derive(Deserialize)]
struct StoredCart {
    #[serde(default)]
    items: Vec<CartLine>,
    #[serde(rename = "gstPercent")]
    gst_percent: Option<TaxPercent>,
}

impl CartState {
    /// An empty cart at `tax_percent`.
    #[must_use]
    pub const fn empty(tax_percent: TaxPercent) -> Self {
        Self {
            lines: Vec::new(),
            tax_percent,
        }
    }

    /// Parse and validate a persisted record, using the standard GST rate
    /// when the record has none.
    ///
    /// # Errors
    ///
    /// Returns [`CartParseError`] if the text is not a valid cart record or
    /// violates a cart invariant.
    pub fn from_json(json: &str) -> Result<Self, CartParseError> {
        Self::from_json_or(json, TaxPercent::default())
    }

    /// Parse and validate a persisted record; a record without
    /// `gstPercent` gets `default_tax`.
    ///
    /// # Errors
    ///
    /// Same as [`CartState::from_json`].
    pub fn from_json_or(json: &str, default_tax: TaxPercent) -> Result<Self, CartParseError> {
        let stored: StoredCart = serde_json::from_str(json)?;
        let state = Self {
            lines: stored.items,
            tax_percent: stored.gst_percent.unwrap_or(default_tax),
        };

        let mut seen = HashSet::with_capacity(state.lines.len());
        for line in &state.lines {
            if line.quantity == 0 {
                return Err(CartParseError::ZeroQuantity(line.id.clone()));
            }
            if !seen.insert(&line.id) {
                return Err(CartParseError::DuplicateId(line.id.clone()));
            }
        }

        Ok(state)
    }

    /// Serialize to the persisted record.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization itself fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Current tax rate.
    #[must_use]
    pub const fn tax_percent(&self) -> TaxPercent {
        self.tax_percent
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// Quantity held for `id`, or 0.
    #[must_use]
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.line(id).map_or(0, |line| line.quantity)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Billing breakdown at the current tax rate.
    #[must_use]
    pub fn billing(&self) -> BillingSummary {
        BillingSummary::compute(&self.lines, self.tax_percent)
    }

    // -------------------------------------------------------------------------
    // Mutations (the store wraps these with load/save/notify)
    // -------------------------------------------------------------------------

    pub(crate) fn add_one(&mut self, product: &Product) -> u32 {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }
        self.lines.push(CartLine::from_product(product));
        1
    }

    pub(crate) fn remove_one(&mut self, id: &ProductId) -> u32 {
        let Some(line) = self.line_mut(id) else {
            return 0;
        };
        line.quantity = line.quantity.saturating_sub(1);
        let remaining = line.quantity;
        if remaining == 0 {
            self.delete(id);
        }
        remaining
    }

    pub(crate) fn set_quantity(&mut self, id: &ProductId, quantity: u32) -> u32 {
        if quantity == 0 {
            self.delete(id);
            return 0;
        }
        match self.line_mut(id) {
            Some(line) => {
                line.quantity = quantity;
                quantity
            }
            None => 0,
        }
    }

    pub(crate) fn upsert_quantity(&mut self, product: &Product, quantity: u32) -> u32 {
        if quantity == 0 {
            self.delete(&product.id);
            return 0;
        }
        match self.line_mut(&product.id) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(CartLine::with_quantity(product, quantity)),
        }
        quantity
    }

    pub(crate) fn delete(&mut self, id: &ProductId) {
        self.lines.retain(|line| &line.id != id);
    }

    pub(crate) const fn set_tax_percent(&mut self, tax_percent: TaxPercent) {
        self.tax_percent = tax_percent;
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.id == id)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::empty(TaxPercent::default())
    }
}
