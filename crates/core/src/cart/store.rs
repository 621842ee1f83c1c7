//! The cart store: one explicit object owning the cart for a session.
//!
//! Every operation restores the record from storage first, so writes made by
//! another store over the same slot are picked up. Every mutation then
//! persists the record and notifies subscribers. Concurrent writers over the
//! same slot are not coordinated; the last write wins.

use tracing::{debug, warn};

use super::billing::BillingSummary;
use super::line::{CartLine, Product};
use super::state::{CartParseError, CartState};
use crate::storage::{KeyValueStore, StorageError};
use crate::types::{ProductId, TaxPercent};

/// Storage slot holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "poppin_deli_cart";

/// Why a stored record could not be restored.
#[derive(Debug, thiserror::Error)]
pub enum CartLoadError {
    /// The record exists but is not a valid cart.
    #[error(transparent)]
    Malformed(#[from] CartParseError),

    /// The slot could not be read.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result of [`CartStore::load`].
#[derive(Debug)]
pub enum LoadOutcome {
    /// A stored record was restored.
    Restored,
    /// Nothing was stored; the cart starts empty.
    Empty,
    /// The stored record was unusable and the cart was reset to empty.
    Recovered(CartLoadError),
}

impl LoadOutcome {
    /// Whether the store fell back to the default cart because of an error.
    #[must_use]
    pub const fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }
}

/// Settings for a [`CartStore`].
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Storage slot name.
    pub storage_key: String,
    /// Tax rate of a fresh or cleared cart.
    pub default_tax: TaxPercent,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: CART_STORAGE_KEY.to_string(),
            default_tax: TaxPercent::default(),
        }
    }
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&CartState) + Send>;

/// Cart store backed by a [`KeyValueStore`].
pub struct CartStore<S> {
    storage: S,
    config: CartConfig,
    state: CartState,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a store with the default slot name and tax rate.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, CartConfig::default())
    }

    /// Create a store with explicit settings.
    #[must_use]
    pub fn with_config(storage: S, config: CartConfig) -> Self {
        let state = CartState::empty(config.default_tax);
        Self {
            storage,
            config,
            state,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// The backing storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Replace the in-memory cart with the stored record.
    ///
    /// Malformed or unreadable records reset the cart to empty; the outcome
    /// says which case applied.
    pub fn load(&mut self) -> LoadOutcome {
        match self.read_record() {
            Ok(Some(state)) => {
                self.state = state;
                LoadOutcome::Restored
            }
            Ok(None) => {
                self.state = self.default_state();
                LoadOutcome::Empty
            }
            Err(e) => {
                warn!(
                    error = %e,
                    key = %self.config.storage_key,
                    "Discarding unusable cart record"
                );
                self.state = self.default_state();
                LoadOutcome::Recovered(e)
            }
        }
    }

    /// Write the in-memory cart to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn save(&self) -> Result<(), StorageError> {
        let json = self.state.to_json().map_err(std::io::Error::from)?;
        self.storage.set(&self.config.storage_key, &json)
    }

    /// Register an observer called with the new cart after every mutation.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&CartState) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Add one unit of `product`. Returns the new quantity for its id.
    pub fn add_item(&mut self, product: &Product) -> u32 {
        self.load();
        let quantity = self.state.add_one(product);
        debug!(id = %product.id, quantity, "Added to cart");
        self.commit();
        quantity
    }

    /// Remove one unit of `id`, deleting the line at zero.
    ///
    /// Returns the remaining quantity; 0 when the id was absent.
    pub fn remove_one_unit(&mut self, id: &ProductId) -> u32 {
        self.load();
        let quantity = self.state.remove_one(id);
        self.commit();
        quantity
    }

    /// Set the quantity of an existing line; zero deletes it.
    ///
    /// A line cannot be created from an id alone, so an absent id with a
    /// positive quantity is left absent. Returns the resulting quantity.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) -> u32 {
        self.load();
        let quantity = self.state.set_quantity(id, quantity);
        self.commit();
        quantity
    }

    /// Create or update the line for `product` with exactly `quantity`.
    pub fn set_product_quantity(&mut self, product: &Product, quantity: u32) -> u32 {
        self.load();
        let quantity = self.state.upsert_quantity(product, quantity);
        self.commit();
        quantity
    }

    /// Remove the line for `id` regardless of its quantity.
    pub fn delete_item(&mut self, id: &ProductId) {
        self.load();
        self.state.delete(id);
        self.commit();
    }

    /// Empty the cart and restore the default tax rate.
    pub fn clear(&mut self) {
        self.state = self.default_state();
        self.commit();
    }

    /// Overwrite the tax rate.
    pub fn set_tax_percent(&mut self, tax_percent: TaxPercent) {
        self.load();
        self.state.set_tax_percent(tax_percent);
        self.commit();
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Quantity held for `id`, or 0.
    pub fn quantity_of(&mut self, id: &ProductId) -> u32 {
        self.load();
        self.state.quantity_of(id)
    }

    /// All lines in insertion order.
    pub fn all_items(&mut self) -> Vec<CartLine> {
        self.load();
        self.state.lines().to_vec()
    }

    /// Total units across all lines.
    pub fn item_count(&mut self) -> u32 {
        self.load();
        self.state.item_count()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&mut self) -> bool {
        self.load();
        self.state.is_empty()
    }

    /// Subtotal, tax and total for the current cart.
    pub fn billing(&mut self) -> BillingSummary {
        self.load();
        self.state.billing()
    }

    /// A copy of the current cart.
    pub fn snapshot(&mut self) -> CartState {
        self.load();
        self.state.clone()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn default_state(&self) -> CartState {
        CartState::empty(self.config.default_tax)
    }

    fn read_record(&self) -> Result<Option<CartState>, CartLoadError> {
        match self.storage.get(&self.config.storage_key)? {
            Some(json) => Ok(Some(CartState::from_json_or(&json, self.config.default_tax)?)),
            None => Ok(None),
        }
    }

    /// Persist and notify. Persistence failures are logged, not raised.
    fn commit(&mut self) {
        if let Err(e) = self.save() {
            warn!(
                error = %e,
                key = %self.config.storage_key,
                "Failed to persist cart"
            );
        }
        for (_, observer) in &mut self.observers {
            observer(&self.state);
        }
    }
}

impl<S> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;
    use std::sync::{Arc, Mutex};

    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::MemoryStore;

    fn product(id: &str, price: &str) -> Product {
        Product::with_text_price(id, format!("Item {id}"), price, "mains")
    }

    fn id(s: &str) -> ProductId {
        ProductId::from(s)
    }

    #[test]
    fn test_add_twice_increments() {
        let mut cart = CartStore::new(MemoryStore::new());
        let a = product("A", "100");
        assert_eq!(cart.add_item(&a), 1);
        assert_eq!(cart.add_item(&a), 2);
        assert_eq!(cart.quantity_of(&id("A")), 2);
        assert_eq!(cart.billing().subtotal.amount(), Decimal::from(200));
    }

    #[test]
    fn test_add_remove_sequences_floor_at_zero() {
        let mut cart = CartStore::new(MemoryStore::new());
        let a = product("A", "10");
        let ops = [true, true, false, false, false, true, false, true, true];
        let mut expected: u32 = 0;
        for add in ops {
            if add {
                cart.add_item(&a);
                expected += 1;
            } else {
                cart.remove_one_unit(&a.id);
                expected = expected.saturating_sub(1);
            }
            assert_eq!(cart.quantity_of(&a.id), expected);
            assert_eq!(cart.all_items().is_empty(), expected == 0);
        }
    }

    #[test]
    fn test_remove_absent_returns_zero() {
        let mut cart = CartStore::new(MemoryStore::new());
        assert_eq!(cart.remove_one_unit(&id("missing")), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = CartStore::new(MemoryStore::new());
        cart.set_product_quantity(&product("A", "10"), 5);
        assert_eq!(cart.quantity_of(&id("A")), 5);
        assert_eq!(cart.set_quantity(&id("A"), 0), 0);
        assert!(cart.all_items().is_empty());
    }

    #[test]
    fn test_set_quantity_updates_existing() {
        let mut cart = CartStore::new(MemoryStore::new());
        cart.add_item(&product("A", "10"));
        assert_eq!(cart.set_quantity(&id("A"), 7), 7);
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut cart = CartStore::new(MemoryStore::new());
        cart.add_item(&product("A", "10"));
        cart.add_item(&product("B", "20"));

        cart.delete_item(&id("A"));
        let once = cart.snapshot();
        cart.delete_item(&id("A"));
        assert_eq!(cart.snapshot(), once);
        assert_eq!(once.lines().len(), 1);
    }

    #[test]
    fn test_clear_resets_lines_and_tax() {
        let mut cart = CartStore::new(MemoryStore::new());
        cart.add_item(&product("A", "10"));
        cart.set_tax_percent(TaxPercent::from_str("18").unwrap());
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.billing().tax_percent, TaxPercent::default());
    }

    #[test]
    fn test_billing_scenario() {
        let mut cart = CartStore::new(MemoryStore::new());
        let a = product("A", "100");
        cart.add_item(&a);
        cart.add_item(&a);
        cart.add_item(&product("B", "50"));
        cart.set_tax_percent(TaxPercent::from_str("5").unwrap());

        let billing = cart.billing();
        assert_eq!(billing.subtotal.amount(), Decimal::from(250));
        assert_eq!(billing.tax_amount.amount(), Decimal::from_str("12.5").unwrap());
        assert_eq!(billing.total.amount(), Decimal::from_str("262.5").unwrap());
    }

    #[test]
    fn test_billing_with_extreme_amounts_does_not_panic() {
        let mut cart = CartStore::new(MemoryStore::new());
        cart.add_item(&product("A", "1000000000"));
        assert!(TaxPercent::from_str("100000000000000000000").is_err());
        cart.set_tax_percent(TaxPercent::from_str("100").unwrap());
        assert_eq!(cart.billing().total.amount(), Decimal::from(2_000_000_000));

        let huge = product("B", "79228162514264337593543950335");
        cart.add_item(&huge);
        cart.add_item(&huge);
        let billing = cart.billing();
        assert_eq!(billing.subtotal.amount(), Decimal::MAX);
        assert_eq!(billing.total.amount(), Decimal::MAX);
    }

    #[test]
    fn test_record_without_tax_restores_configured_default() {
        let storage = MemoryStore::new();
        storage
            .set(CART_STORAGE_KEY, r#"{"items":[{"id":"A","name":"A","price":10,"qty":1}]}"#)
            .unwrap();
        let config = CartConfig {
            default_tax: TaxPercent::from_str("0").unwrap(),
            ..CartConfig::default()
        };
        let mut cart = CartStore::with_config(&storage, config);

        assert!(matches!(cart.load(), LoadOutcome::Restored));
        assert_eq!(cart.billing().total.amount(), Decimal::from(10));
    }

    /// Reads nothing and refuses every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_still_applies_and_notifies() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut cart = CartStore::new(ReadOnlyStore);
        let sink = Arc::clone(&seen);
        cart.subscribe(move |state| sink.lock().unwrap().push(state.item_count()));

        assert_eq!(cart.add_item(&product("A", "10")), 1);
        assert!(cart.save().is_err());
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_insertion_order_is_display_order() {
        let mut cart = CartStore::new(MemoryStore::new());
        for key in ["C", "A", "B", "A"] {
            cart.add_item(&product(key, "1"));
        }
        let ids: Vec<_> = cart.all_items().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, [id("C"), id("A"), id("B")]);
    }

    #[test]
    fn test_load_distinguishes_empty_from_recovered() {
        let storage = MemoryStore::new();
        let mut cart = CartStore::new(&storage);
        assert!(matches!(cart.load(), LoadOutcome::Empty));

        storage.set(CART_STORAGE_KEY, "{broken").unwrap();
        let outcome = cart.load();
        assert!(outcome.is_recovered());
        assert!(cart.is_empty());

        cart.add_item(&product("A", "10"));
        assert!(matches!(cart.load(), LoadOutcome::Restored));
    }

    #[test]
    fn test_operations_pick_up_external_writes() {
        let storage = MemoryStore::new();
        let mut first = CartStore::new(&storage);
        let mut second = CartStore::new(&storage);

        first.add_item(&product("A", "10"));
        assert_eq!(second.quantity_of(&id("A")), 1);
        second.add_item(&product("A", "10"));
        assert_eq!(first.quantity_of(&id("A")), 2);
    }

    #[test]
    fn test_observers_notified_per_mutation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut cart = CartStore::new(MemoryStore::new());

        let sink = Arc::clone(&seen);
        let subscription = cart.subscribe(move |state| {
            sink.lock().unwrap().push(state.item_count());
        });

        cart.add_item(&product("A", "10"));
        cart.add_item(&product("A", "10"));
        let _ = cart.quantity_of(&id("A"));
        cart.clear();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 0]);

        assert!(cart.unsubscribe(subscription));
        assert!(!cart.unsubscribe(subscription));
        cart.add_item(&product("A", "10"));
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_custom_storage_key_and_default_tax() {
        let storage = MemoryStore::new();
        let config = CartConfig {
            storage_key: "other_cart".to_string(),
            default_tax: TaxPercent::from_str("0").unwrap(),
        };
        let mut cart = CartStore::with_config(&storage, config);
        cart.add_item(&product("A", "10"));

        assert!(storage.get("other_cart").unwrap().is_some());
        assert!(storage.get(CART_STORAGE_KEY).unwrap().is_none());
        assert_eq!(cart.billing().total.amount(), Decimal::from(10));
    }
}
