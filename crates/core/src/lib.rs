//! Poppin Deli Core - Cart, billing and order formatting.
//!
//! This crate holds the ordering logic shared by every Poppin Deli front end:
//! - `storefront` - Content feed, caching and file-backed storage
//! - `cli` - Command-line front end for menu, cart and checkout
//!
//! # Architecture
//!
//! The core crate does no network or filesystem I/O. Persistence goes
//! through the [`storage::KeyValueStore`] trait so the same cart logic runs
//! over an in-memory map in tests and over files in the CLI.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, tax rates and statuses
//! - [`storage`] - Key-value persistence trait and in-memory store
//! - [`cart`] - Cart lines, state, billing and the cart store
//! - [`order`] - Order message and deep-link formatting
//! - [`checkout`] - Three-step checkout state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod order;
pub mod storage;
pub mod types;

pub use types::*;
