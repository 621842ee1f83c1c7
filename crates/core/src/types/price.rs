//! Type-safe money and tax-rate representation using decimal arithmetic.
//!
//! Amounts are Indian rupees. Display follows the menu convention: the rupee
//! sign followed by the amount with trailing zeros dropped (`₹262.5`, `₹200`).

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currency symbol used for every displayed amount.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Errors raised when constructing a [`Price`] or [`TaxPercent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Prices cannot be negative.
    #[error("price cannot be negative (got {0})")]
    NegativePrice(Decimal),
    /// Tax rates cannot be negative.
    #[error("tax percent cannot be negative (got {0})")]
    NegativeTax(Decimal),
    /// Tax rates are capped at [`MAX_TAX_PERCENT`].
    #[error("tax percent cannot exceed {MAX_TAX_PERCENT} (got {0})")]
    TaxTooHigh(Decimal),
    /// Input text is not a number.
    #[error("not a decimal number: {0:?}")]
    NotANumber(String),
}

/// Highest accepted tax rate, in percent.
pub const MAX_TAX_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Round a monetary amount to two decimal places, half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A non-negative rupee amount.
///
/// Arithmetic saturates at [`Decimal::MAX`] instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NegativePrice`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, AmountError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(AmountError::NegativePrice(amount));
        }
        Ok(Self(amount))
    }

    /// Coerce free-form text into a price.
    ///
    /// Reads the leading numeric part of the text (`"120 Rs"` is 120) and
    /// falls back to zero when there is none or the result is negative.
    #[must_use]
    pub fn coerce(text: &str) -> Self {
        parse_leading_decimal(text)
            .and_then(|d| Self::new(d).ok())
            .unwrap_or(Self::ZERO)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// This amount rounded to two decimal places.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self(round_money(self.0))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim())
            .map_err(|_| AmountError::NotANumber(s.to_string()))?;
        Self::new(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL}{}", self.0.normalize())
    }
}

/// A tax rate expressed in percent (5 means 5%), between 0 and
/// [`MAX_TAX_PERCENT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct TaxPercent(Decimal);

impl TaxPercent {
    /// Create a tax rate.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NegativeTax`] for rates below zero and
    /// [`AmountError::TaxTooHigh`] for rates above [`MAX_TAX_PERCENT`].
    pub fn new(percent: Decimal) -> Result<Self, AmountError> {
        if percent.is_sign_negative() && !percent.is_zero() {
            return Err(AmountError::NegativeTax(percent));
        }
        if percent > MAX_TAX_PERCENT {
            return Err(AmountError::TaxTooHigh(percent));
        }
        Ok(Self(percent))
    }

    /// The underlying percentage.
    #[must_use]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// Tax owed on `amount`, rounded to two decimal places.
    ///
    /// Amounts too large to multiply exactly are scaled down first.
    #[must_use]
    pub fn tax_on(&self, amount: Price) -> Price {
        let tax = amount.0.checked_mul(self.0).map_or_else(
            || (amount.0 / Decimal::ONE_HUNDRED).saturating_mul(self.0),
            |product| product / Decimal::ONE_HUNDRED,
        );
        Price(round_money(tax))
    }
}

/// The default GST rate applied to pickup orders.
impl Default for TaxPercent {
    fn default() -> Self {
        Self(Decimal::from(5))
    }
}

impl TryFrom<Decimal> for TaxPercent {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaxPercent> for Decimal {
    fn from(tax: TaxPercent) -> Self {
        tax.0
    }
}

impl FromStr for TaxPercent {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let percent = Decimal::from_str(s.trim().trim_end_matches('%'))
            .map_err(|_| AmountError::NotANumber(s.to_string()))?;
        Self::new(percent)
    }
}

impl fmt::Display for TaxPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Parse the longest leading `[+-]digits[.digits]` run of `text`.
fn parse_leading_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in trimmed.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    let candidate = trimmed.get(..end)?.trim_end_matches('.');
    Decimal::from_str(candidate).ok()
}
