//! Derived subtotal, tax and total for a cart.

use serde::Serialize;

use super::line::CartLine;
use crate::types::{Price, TaxPercent};

/// Billing breakdown for the current cart. Never stored.
///
/// Every amount is rounded to two decimal places, and
/// `total == subtotal + tax_amount` holds exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSummary {
    pub subtotal: Price,
    #[serde(rename = "gstPercent")]
    pub tax_percent: TaxPercent,
    #[serde(rename = "gstAmount")]
    pub tax_amount: Price,
    pub total: Price,
}

impl BillingSummary {
    /// Compute the breakdown for `lines` at `tax_percent`.
    #[must_use]
    pub fn compute(lines: &[CartLine], tax_percent: TaxPercent) -> Self {
        let subtotal = lines.iter().map(CartLine::line_total).sum::<Price>().rounded();
        let tax_amount = tax_percent.tax_on(subtotal);

        Self {
            subtotal,
            tax_percent,
            tax_amount,
            total: subtotal + tax_amount,
        }
    }

    /// Label for the tax row, e.g. `GST (5%)`.
    #[must_use]
    pub fn tax_label(&self) -> String {
        format!("GST ({}%)", self.tax_percent)
    }
}
