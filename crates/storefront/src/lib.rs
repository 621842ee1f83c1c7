//! Poppin Deli Storefront library.
//!
//! Everything around the ordering core that touches the outside world:
//! - [`sheets`] - Public Google Sheets read through the gviz endpoint
//! - [`content`] - Cached site content with bundled fallbacks
//! - [`storage`] - File-backed key-value store
//! - [`config`] - Environment configuration
//! - [`state`] - Shared application state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod error;
pub mod sheets;
pub mod state;
pub mod storage;

pub use error::{AppError, Result};
pub use state::AppState;
