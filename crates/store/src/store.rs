//! The cart store: read-modify-write over a persisted cart record.
//!
//! Every mutation follows the same cycle:
//!
//! 1. read the whole record (unreadable or missing means an empty cart)
//! 2. apply one change to the in-memory [`Cart`]
//! 3. write the whole record back
//! 4. notify listeners
//!
//! The cycle runs to completion inside one call. The store holds no lock of
//! its own; callers that share a store between threads serialize mutations
//! themselves.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use shopcart_core::{AddOutcome, Cart, NewLineItem, ProductId, Quantity, QuantityChange};

use crate::error::Result;
use crate::events::{CartEvent, CartListener};
use crate::storage::CartStorage;
use crate::summary::{CartSummary, ShippingPolicy};

/// Record key used when none is given.
pub const DEFAULT_CART_KEY: &str = "cart";

/// The single source of truth for one cart.
pub struct CartStore<S> {
    storage: S,
    key: String,
    shipping: ShippingPolicy,
    listeners: Vec<Arc<dyn CartListener>>,
}

impl<S> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("shipping", &self.shipping)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<S: CartStorage> CartStore<S> {
    /// Create a store for the record at [`DEFAULT_CART_KEY`].
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_CART_KEY)
    }

    /// Create a store for the record at `key`.
    #[must_use]
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            shipping: ShippingPolicy::default(),
            listeners: Vec::new(),
        }
    }

    /// Use a different shipping policy for [`CartStore::summary`].
    #[must_use]
    pub fn with_shipping(mut self, shipping: ShippingPolicy) -> Self {
        self.shipping = shipping;
        self
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Register a listener for cart events.
    pub fn subscribe(&mut self, listener: Arc<dyn CartListener>) {
        self.listeners.push(listener);
    }

    /// The persisted cart, or an empty cart.
    ///
    /// Never fails: a storage read error or an unreadable record is logged
    /// and treated as an empty cart.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn get_cart(&self) -> Cart {
        match self.storage.read(&self.key) {
            Ok(Some(raw)) => Cart::decode(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding unreadable cart record");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cart record");
                Cart::new()
            }
        }
    }

    /// Add units of a product, merging with an existing line of the same ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be written.
    #[instrument(skip(self, item), fields(key = %self.key, product_id = %item.id))]
    pub fn add_item(&self, item: NewLineItem, quantity: Quantity) -> Result<Cart> {
        let mut cart = self.get_cart();
        let id = item.id.clone();
        let title = item.title.clone();

        let outcome = cart.add(item, quantity);
        self.save(&cart)?;

        match outcome {
            AddOutcome::Appended => info!(quantity = quantity.get(), "Added new cart line"),
            AddOutcome::Merged(total) => {
                info!(quantity = quantity.get(), total = total.get(), "Merged into cart line");
            }
        }

        self.emit(&CartEvent::ItemAdded {
            id,
            title,
            quantity,
        });
        self.emit_count(&cart);
        Ok(cart)
    }

    /// Add a product with an unvalidated quantity.
    ///
    /// Missing, non-numeric, zero or negative quantities add one unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be written.
    pub fn add_item_lenient(&self, item: NewLineItem, quantity: &Value) -> Result<Cart> {
        self.add_item(item, Quantity::coerce(quantity))
    }

    /// Remove a product's line. A product not in the cart is a no-op and
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be written.
    #[instrument(skip(self, id), fields(key = %self.key, product_id = %id))]
    pub fn remove_item(&self, id: &ProductId) -> Result<Cart> {
        let mut cart = self.get_cart();
        let Some(removed) = cart.remove(id) else {
            debug!("Product not in cart, nothing to remove");
            return Ok(cart);
        };

        self.save(&cart)?;
        info!("Removed cart line");

        self.emit(&CartEvent::ItemRemoved {
            id: removed.id,
            title: removed.title,
        });
        self.emit_count(&cart);
        Ok(cart)
    }

    /// Set a product's quantity. Zero or less removes the line; a product not
    /// in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be written.
    #[instrument(skip(self, id), fields(key = %self.key, product_id = %id))]
    pub fn update_quantity(&self, id: &ProductId, quantity: i64) -> Result<Cart> {
        let cart = self.get_cart();
        self.apply_quantity(cart, id, quantity)
    }

    /// Add one unit to an existing line. A product not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be written.
    #[instrument(skip(self, id), fields(key = %self.key, product_id = %id))]
    pub fn increment(&self, id: &ProductId) -> Result<Cart> {
        self.step_quantity(id, 1)
    }

    /// Take one unit off an existing line, removing it at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be written.
    #[instrument(skip(self, id), fields(key = %self.key, product_id = %id))]
    pub fn decrement(&self, id: &ProductId) -> Result<Cart> {
        self.step_quantity(id, -1)
    }

    fn step_quantity(&self, id: &ProductId, delta: i64) -> Result<Cart> {
        let cart = self.get_cart();
        let Some(current) = cart.get(id).map(|line| i64::from(line.quantity.get())) else {
            debug!("Product not in cart, nothing to adjust");
            return Ok(cart);
        };
        self.apply_quantity(cart, id, current + delta)
    }

    fn apply_quantity(&self, mut cart: Cart, id: &ProductId, quantity: i64) -> Result<Cart> {
        match cart.set_quantity(id, quantity) {
            QuantityChange::Missing => {
                debug!("Product not in cart, nothing to update");
                return Ok(cart);
            }
            QuantityChange::Updated(quantity) => {
                self.save(&cart)?;
                info!(quantity = quantity.get(), "Updated cart line quantity");
                self.emit(&CartEvent::QuantityChanged {
                    id: id.clone(),
                    quantity,
                });
            }
            QuantityChange::Removed(removed) => {
                self.save(&cart)?;
                info!(requested = quantity, "Removed cart line at zero quantity");
                self.emit(&CartEvent::ItemRemoved {
                    id: removed.id,
                    title: removed.title,
                });
            }
        }
        self.emit_count(&cart);
        Ok(cart)
    }

    /// Delete the persisted record entirely.
    ///
    /// Afterwards the storage holds no record for this key, which is distinct
    /// from holding an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be removed.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(&self.key)?;
        info!("Cleared cart");
        self.emit(&CartEvent::Cleared);
        self.emit(&CartEvent::CountChanged { count: 0 });
        Ok(())
    }

    /// Sum of price times quantity. Unreadable prices contribute zero.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.get_cart().subtotal()
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.get_cart().item_count()
    }

    /// Subtotal, shipping, and grand total under this store's policy.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::new(&self.get_cart(), &self.shipping)
    }

    /// Summary of an already-loaded cart under this store's policy.
    #[must_use]
    pub fn summarize(&self, cart: &Cart) -> CartSummary {
        CartSummary::new(cart, &self.shipping)
    }

    fn save(&self, cart: &Cart) -> Result<()> {
        let raw = cart.encode()?;
        self.storage.write(&self.key, &raw)?;
        Ok(())
    }

    fn emit(&self, event: &CartEvent) {
        for listener in &self.listeners {
            listener.on_event(event);
        }
    }

    fn emit_count(&self, cart: &Cart) {
        self.emit(&CartEvent::CountChanged {
            count: cart.item_count(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use shopcart_core::Price;

    use super::*;
    use crate::events::RecordingListener;
    use crate::storage::{MemoryStorage, StorageError};

    fn item(id: &str, price: &str) -> NewLineItem {
        NewLineItem {
            id: ProductId::new(id),
            title: format!("Item {id}"),
            price: Price::new(price),
            image: Some(format!("./image/items/item-{id}.png")),
        }
    }

    fn qty(count: u32) -> Quantity {
        Quantity::new(count).unwrap()
    }

    fn store() -> CartStore<Arc<MemoryStorage>> {
        CartStore::new(Arc::new(MemoryStorage::new()))
    }

    /// Storage whose writes always fail.
    struct ReadOnlyStorage;

    impl CartStorage for ReadOnlyStorage {
        fn read(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&self, key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_owned()))
        }

        fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_owned()))
        }
    }

    /// Storage whose reads always fail.
    struct BrokenReads;

    impl CartStorage for BrokenReads {
        fn read(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
            Err(StorageError::Poisoned)
        }

        fn write(&self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Ok(())
        }

        fn remove(&self, _key: &str) -> std::result::Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_empty_by_default() {
        let store = store();
        assert!(store.get_cart().is_empty());
        assert_eq!(store.item_count(), 0);
        assert_eq!(store.total(), Decimal::ZERO);
    }

    #[test]
    fn test_add_persists() {
        let store = store();
        let returned = store.add_item(item("1", "120"), qty(2)).unwrap();

        assert_eq!(returned, store.get_cart());
        let raw = store.storage().read(DEFAULT_CART_KEY).unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            json!([{
                "id": "1",
                "title": "Item 1",
                "price": "120",
                "image": "./image/items/item-1.png",
                "quantity": 2
            }])
        );
    }

    #[test]
    fn test_add_merges_by_id() {
        let store = store();
        store.add_item(item("1", "120"), qty(2)).unwrap();
        let cart = store.add_item(item("1", "120"), qty(3)).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&ProductId::new("1")).unwrap().quantity.get(), 5);
    }

    #[test]
    fn test_add_keeps_ids_unique() {
        let store = store();
        for id in ["1", "2", "1", "3", "2", "1"] {
            store.add_item(item(id, "10"), Quantity::ONE).unwrap();
        }

        let cart = store.get_cart();
        let mut ids: Vec<_> = cart.iter().map(|line| line.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        ids.dedup();
        assert_eq!(ids.len(), cart.len());
        assert_eq!(store.item_count(), 6);
    }

    #[test]
    fn test_add_lenient_quantity() {
        let store = store();
        store.add_item_lenient(item("1", "10"), &json!("3")).unwrap();
        store.add_item_lenient(item("2", "10"), &json!("many")).unwrap();
        store.add_item_lenient(item("3", "10"), &Value::Null).unwrap();
        store.add_item_lenient(item("4", "10"), &json!(-2)).unwrap();

        let cart = store.get_cart();
        let quantities: Vec<_> = cart.iter().map(|line| line.quantity.get()).collect();
        assert_eq!(quantities, [3, 1, 1, 1]);
    }

    #[test]
    fn test_add_re_reads_existing_quantity() {
        let store = store();
        store
            .storage()
            .write(DEFAULT_CART_KEY, r#"[{"id": "1", "price": "5", "quantity": "oops"}]"#)
            .unwrap();

        let cart = store.add_item(item("1", "5"), qty(2)).unwrap();
        assert_eq!(cart.get(&ProductId::new("1")).unwrap().quantity.get(), 3);
    }

    #[test]
    fn test_remove_item() {
        let store = store();
        store.add_item(item("1", "120"), Quantity::ONE).unwrap();
        store.add_item(item("2", "80"), Quantity::ONE).unwrap();

        let cart = store.remove_item(&ProductId::new("1")).unwrap();
        assert!(!cart.contains(&ProductId::new("1")));
        assert_eq!(store.get_cart(), cart);
    }

    #[test]
    fn test_remove_missing_returns_unchanged() {
        let store = store();
        store.add_item(item("1", "120"), qty(2)).unwrap();
        let before = store.get_cart();

        let after = store.remove_item(&ProductId::new("x")).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_remove_missing_does_not_create_record() {
        let store = store();
        store.remove_item(&ProductId::new("x")).unwrap();
        assert_eq!(store.storage().read(DEFAULT_CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_update_quantity() {
        let store = store();
        store.add_item(item("1", "120"), Quantity::ONE).unwrap();

        let cart = store.update_quantity(&ProductId::new("1"), 7).unwrap();
        assert_eq!(cart.item_count(), 7);
        assert_eq!(store.item_count(), 7);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let store = store();
        store.add_item(item("1", "120"), qty(2)).unwrap();
        store.add_item(item("2", "80"), Quantity::ONE).unwrap();

        let cart = store.update_quantity(&ProductId::new("1"), 0).unwrap();
        assert!(!cart.contains(&ProductId::new("1")));
        assert!(!store.get_cart().contains(&ProductId::new("1")));
    }

    #[test]
    fn test_update_quantity_missing_is_noop() {
        let store = store();
        store.add_item(item("1", "120"), qty(2)).unwrap();
        let before = store.get_cart();

        let cart = store.update_quantity(&ProductId::new("9"), 4).unwrap();
        assert_eq!(cart, before);
    }

    #[test]
    fn test_increment_and_decrement() {
        let store = store();
        store.add_item(item("1", "120"), Quantity::ONE).unwrap();

        store.increment(&ProductId::new("1")).unwrap();
        assert_eq!(store.item_count(), 2);

        store.decrement(&ProductId::new("1")).unwrap();
        assert_eq!(store.item_count(), 1);

        let cart = store.decrement(&ProductId::new("1")).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_increment_missing_is_noop() {
        let store = store();
        let cart = store.increment(&ProductId::new("1")).unwrap();
        assert!(cart.is_empty());
        assert_eq!(store.storage().read(DEFAULT_CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_clear_removes_record() {
        let store = store();
        store.add_item(item("1", "120"), Quantity::ONE).unwrap();

        store.clear().unwrap();

        assert_eq!(store.storage().read(DEFAULT_CART_KEY).unwrap(), None);
        assert!(store.get_cart().is_empty());
    }

    #[test]
    fn test_total() {
        let store = store();
        store.add_item(item("1", "120"), qty(2)).unwrap();
        store.add_item(item("2", "80"), Quantity::ONE).unwrap();

        assert_eq!(store.total(), Decimal::from(320));
        assert_eq!(store.summary().total, Decimal::from(330));
    }

    #[test]
    fn test_corrupt_record_reads_as_empty() {
        let store = store();
        store.storage().write(DEFAULT_CART_KEY, "{{not json").unwrap();

        assert!(store.get_cart().is_empty());
        assert_eq!(store.item_count(), 0);
    }

    #[test]
    fn test_corrupt_record_is_replaced_on_add() {
        let store = store();
        store.storage().write(DEFAULT_CART_KEY, "\"cart\"").unwrap();

        let cart = store.add_item(item("1", "10"), Quantity::ONE).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(store.get_cart(), cart);
    }

    #[test]
    fn test_read_failure_reads_as_empty() {
        let store = CartStore::new(BrokenReads);
        assert!(store.get_cart().is_empty());
        assert_eq!(store.total(), Decimal::ZERO);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let store = CartStore::new(ReadOnlyStorage);
        assert!(store.add_item(item("1", "10"), Quantity::ONE).is_err());
        assert!(store.clear().is_err());
    }

    #[test]
    fn test_separate_keys_are_separate_carts() {
        let storage = Arc::new(MemoryStorage::new());
        let first = CartStore::with_key(Arc::clone(&storage), "cart:a");
        let second = CartStore::with_key(Arc::clone(&storage), "cart:b");

        first.add_item(item("1", "10"), qty(2)).unwrap();

        assert_eq!(first.item_count(), 2);
        assert_eq!(second.item_count(), 0);
    }

    #[test]
    fn test_listener_events() {
        let listener = Arc::new(RecordingListener::new());
        let mut store = store();
        store.subscribe(listener.clone());

        store.add_item(item("1", "120"), qty(2)).unwrap();
        assert_eq!(
            listener.take(),
            [
                CartEvent::ItemAdded {
                    id: ProductId::new("1"),
                    title: "Item 1".to_string(),
                    quantity: qty(2),
                },
                CartEvent::CountChanged { count: 2 },
            ]
        );

        store.update_quantity(&ProductId::new("1"), 0).unwrap();
        assert_eq!(listener.take_notifications(), ["Item 1 removed from cart!"]);

        store.remove_item(&ProductId::new("1")).unwrap();
        assert!(listener.take().is_empty());

        store.clear().unwrap();
        assert_eq!(
            listener.take(),
            [CartEvent::Cleared, CartEvent::CountChanged { count: 0 }]
        );
    }

    #[test]
    fn test_no_events_when_write_fails() {
        let listener = Arc::new(RecordingListener::new());
        let mut store = CartStore::new(ReadOnlyStorage);
        store.subscribe(listener.clone());

        let _ = store.add_item(item("1", "10"), Quantity::ONE);
        assert!(listener.take().is_empty());
    }
}
