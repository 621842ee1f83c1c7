//! Core types for Poppin Deli.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod status;

pub use id::*;
pub use price::{AmountError, CURRENCY_SYMBOL, MAX_TAX_PERCENT, Price, TaxPercent, round_money};
pub use status::*;
