//! Shopping cart: lines, persisted state, billing and the store that owns
//! them.
//!
//! # Example
//!
//! ```rust
//! use poppin_deli_core::cart::{CartStore, Product};
//! use poppin_deli_core::storage::MemoryStore;
//!
//! let mut cart = CartStore::new(MemoryStore::new());
//! let sandwich = Product::with_text_price("A", "Club Sandwich", "100", "sandwiches");
//!
//! cart.add_item(&sandwich);
//! cart.add_item(&sandwich);
//!
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.billing().subtotal.to_string(), "₹200");
//! ```

pub mod billing;
pub mod line;
pub mod state;
pub mod store;

pub use billing::BillingSummary;
pub use line::{CartLine, Product};
pub use state::{CartParseError, CartState};
pub use store::{
    CART_STORAGE_KEY, CartConfig, CartLoadError, CartStore, LoadOutcome, SubscriptionId,
};
