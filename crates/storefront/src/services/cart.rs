//! Cart store: the in-memory cart mirrored into durable storage.
//!
//! Mutations are applied to the in-memory [`Cart`] first and then persisted.
//! A failed write is logged and never rolls the in-memory change back, so the
//! cart in hand stays authoritative for the rest of the request.

use grab_eat_core::{Cart, MenuItemId};
use tracing::instrument;

use crate::storage::{KeyValueStore, StorageError, keys};

/// A cart bound to the storage it was restored from.
pub struct CartStore<S> {
    store: S,
    cart: Cart,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Restore the cart from `store`.
    ///
    /// A missing, unreadable, or corrupted copy yields an empty cart.
    pub async fn restore(store: S) -> Self {
        let cart = match store.get(keys::CART).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding corrupted stored cart");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored cart");
                Cart::new()
            }
        };

        Self { store, cart }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The storage this cart persists to.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Current quantity of `item_id`, 0 if absent.
    #[must_use]
    pub fn count(&self, item_id: &MenuItemId) -> u32 {
        self.cart.count(item_id)
    }

    /// Add one of `item_id`, returning the new quantity.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn add(&mut self, item_id: &MenuItemId) -> u32 {
        let quantity = self.cart.add(item_id);
        self.persist().await;
        quantity
    }

    /// Remove one of `item_id`, returning the new quantity.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove(&mut self, item_id: &MenuItemId) -> u32 {
        let quantity = self.cart.remove(item_id);
        self.persist().await;
        quantity
    }

    /// Set the quantity of `item_id`; zero removes it.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn set_quantity(&mut self, item_id: &MenuItemId, quantity: u32) -> u32 {
        let quantity = self.cart.set_quantity(item_id, quantity);
        self.persist().await;
        quantity
    }

    /// Empty the cart and delete the durable copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable copy could not be deleted. The
    /// in-memory cart is empty either way.
    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.cart.clear();
        self.store.remove(keys::CART).await
    }

    /// Write the cart to storage. An empty cart deletes the key.
    async fn persist(&self) {
        let result = if self.cart.is_empty() {
            self.store.remove(keys::CART).await
        } else {
            match serde_json::to_string(&self.cart) {
                Ok(raw) => self.store.set(keys::CART, raw).await,
                Err(e) => Err(StorageError::Unavailable(e.to_string())),
            }
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist cart");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    fn id(s: &str) -> MenuItemId {
        MenuItemId::new(s)
    }

    #[tokio::test]
    async fn test_restore_empty_store() {
        let cart = CartStore::restore(InMemoryStore::new()).await;
        assert!(cart.cart().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_persist_and_restore() {
        let store = InMemoryStore::new();
        let mut cart = CartStore::restore(store.clone()).await;
        cart.add(&id("a")).await;
        cart.add(&id("a")).await;
        cart.add(&id("b")).await;
        assert_eq!(store.peek(keys::CART).as_deref(), Some(r#"{"a":2,"b":1}"#));

        let restored = CartStore::restore(store).await;
        assert_eq!(restored.cart(), cart.cart());
        assert_eq!(restored.count(&id("a")), 2);
    }

    #[tokio::test]
    async fn test_corrupted_copy_yields_empty_cart() {
        for raw in ["not json", r#"{"a":0}"#, r#"{"a":-1}"#, "[1,2]"] {
            let store = InMemoryStore::new();
            store.seed(keys::CART, raw);
            let cart = CartStore::restore(store).await;
            assert!(cart.cart().is_empty(), "{raw} should restore empty");
        }
    }

    #[tokio::test]
    async fn test_removing_last_unit_drops_key() {
        let store = InMemoryStore::new();
        let mut cart = CartStore::restore(store.clone()).await;
        cart.add(&id("a")).await;
        assert_eq!(cart.remove(&id("a")).await, 0);
        assert!(!cart.cart().contains(&id("a")));
        assert_eq!(store.peek(keys::CART), None);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_in_memory_change() {
        let store = InMemoryStore::new();
        let mut cart = CartStore::restore(store.clone()).await;
        cart.add(&id("a")).await;

        store.fail_writes(true);
        assert_eq!(cart.add(&id("a")).await, 2);
        assert_eq!(cart.count(&id("a")), 2);
        assert_eq!(store.peek(keys::CART).as_deref(), Some(r#"{"a":1}"#));
    }

    #[tokio::test]
    async fn test_clear_removes_durable_copy() {
        let store = InMemoryStore::new();
        let mut cart = CartStore::restore(store.clone()).await;
        cart.add(&id("a")).await;
        cart.set_quantity(&id("b"), 3).await;

        cart.clear().await.unwrap();
        assert!(cart.cart().is_empty());
        assert_eq!(store.peek(keys::CART), None);
    }
}
