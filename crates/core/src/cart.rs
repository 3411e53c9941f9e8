//! The shopping cart: menu item id to quantity.
//!
//! Quantities are stored as [`NonZeroU32`], so an entry can never hold zero:
//! an item whose quantity reaches zero is removed from the mapping. The
//! serialized form is a plain JSON object (`{"<item id>": <quantity>}`), which
//! is what the storefront writes to durable storage.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::menu::MenuItem;
use crate::types::{MenuItemId, Money};

/// Mapping from menu item to a positive quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeMap<MenuItemId, NonZeroU32>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the quantity of `item_id` by one, returning the new quantity.
    pub fn add(&mut self, item_id: &MenuItemId) -> u32 {
        let quantity = self
            .items
            .get(item_id)
            .map_or(NonZeroU32::MIN, |q| q.saturating_add(1));
        self.items.insert(item_id.clone(), quantity);
        quantity.get()
    }

    /// Decrement the quantity of `item_id` by one, returning the new quantity.
    ///
    /// Reaching zero deletes the entry. Removing an absent item is a no-op.
    pub fn remove(&mut self, item_id: &MenuItemId) -> u32 {
        let Some(current) = self.items.get(item_id).copied() else {
            return 0;
        };

        match NonZeroU32::new(current.get() - 1) {
            Some(quantity) => {
                self.items.insert(item_id.clone(), quantity);
                quantity.get()
            }
            None => {
                self.items.remove(item_id);
                0
            }
        }
    }

    /// Set the quantity of `item_id` directly; zero deletes the entry.
    pub fn set_quantity(&mut self, item_id: &MenuItemId, quantity: u32) -> u32 {
        match NonZeroU32::new(quantity) {
            Some(quantity) => {
                self.items.insert(item_id.clone(), quantity);
            }
            None => {
                self.items.remove(item_id);
            }
        }
        quantity
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Current quantity for `item_id`, or 0 when absent.
    #[must_use]
    pub fn count(&self, item_id: &MenuItemId) -> u32 {
        self.items.get(item_id).map_or(0, |q| q.get())
    }

    /// Whether `item_id` has an entry.
    #[must_use]
    pub fn contains(&self, item_id: &MenuItemId) -> bool {
        self.items.contains_key(item_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .values()
            .fold(0_u32, |sum, q| sum.saturating_add(q.get()))
    }

    /// Iterate over `(item id, quantity)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&MenuItemId, u32)> {
        self.items.iter().map(|(id, q)| (id, q.get()))
    }

    /// Resolve cart entries against the menu.
    ///
    /// Entries whose item is no longer on the menu are skipped.
    #[must_use]
    pub fn lines(&self, menu: &[MenuItem]) -> Vec<CartLine> {
        self.iter()
            .filter_map(|(id, quantity)| {
                menu.iter()
                    .find(|item| &item.id == id)
                    .map(|item| CartLine::new(item, quantity))
            })
            .collect()
    }
}

/// A cart entry resolved against its menu item.
///
/// Serializes with the field names the checkout-session endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub menu_item_id: MenuItemId,
    pub title: String,
    /// Unit price.
    pub price: Money,
    pub quantity: u32,
    /// `price * quantity`.
    pub total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLine {
    /// Build a line for `quantity` units of `item`.
    #[must_use]
    pub fn new(item: &MenuItem, quantity: u32) -> Self {
        Self {
            menu_item_id: item.id.clone(),
            title: item.title.clone(),
            price: item.price,
            quantity,
            total: item.price.times(quantity),
            image_url: item.image_url.clone(),
        }
    }
}

/// Sum of line totals.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> Money {
    lines.iter().map(|line| line.total).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn id(value: &str) -> MenuItemId {
        MenuItemId::new(value)
    }

    fn menu_item(value: &str, cents: i64) -> MenuItem {
        MenuItem {
            id: id(value),
            title: format!("Item {value}"),
            description: String::new(),
            price: Money::from_cents(cents),
            category: None,
            is_available: true,
            combo: false,
            image: None,
            image_url: None,
        }
    }

    #[test]
    fn test_add_initializes_and_increments() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(&id("a")), 1);
        assert_eq!(cart.add(&id("a")), 2);
        assert_eq!(cart.count(&id("a")), 2);
        assert_eq!(cart.count(&id("missing")), 0);
    }

    #[test]
    fn test_remove_to_zero_deletes_entry() {
        let mut cart = Cart::new();
        cart.add(&id("a"));
        cart.add(&id("a"));

        assert_eq!(cart.remove(&id("a")), 1);
        assert!(cart.contains(&id("a")));
        assert_eq!(cart.remove(&id("a")), 0);
        assert!(!cart.contains(&id("a")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        assert_eq!(cart.remove(&id("ghost")), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_arbitrary_sequences_never_store_zero() {
        let ops = [
            ("a", true),
            ("b", false),
            ("a", false),
            ("a", false),
            ("b", true),
            ("b", true),
            ("c", false),
            ("b", false),
            ("a", true),
        ];

        let mut cart = Cart::new();
        for (item, add) in ops {
            if add {
                cart.add(&id(item));
            } else {
                cart.remove(&id(item));
            }

            let json = serde_json::to_value(&cart).unwrap();
            for (_, value) in json.as_object().unwrap() {
                assert!(value.as_u64().unwrap() > 0);
            }
        }

        assert_eq!(cart.count(&id("a")), 1);
        assert_eq!(cart.count(&id("b")), 1);
        assert!(!cart.contains(&id("c")));
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.set_quantity(&id("a"), 4);
        assert_eq!(cart.count(&id("a")), 4);
        cart.set_quantity(&id("a"), 0);
        assert!(!cart.contains(&id("a")));
    }

    #[test]
    fn test_total_quantity() {
        let mut cart = Cart::new();
        cart.set_quantity(&id("a"), 2);
        cart.set_quantity(&id("b"), 3);
        assert_eq!(cart.total_quantity(), 5);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_storage_format_round_trip() {
        let mut cart = Cart::new();
        cart.add(&id("a"));
        cart.add(&id("b"));
        cart.add(&id("b"));

        let stored = serde_json::to_string(&cart).unwrap();
        assert_eq!(stored, r#"{"a":1,"b":2}"#);

        let restored: Cart = serde_json::from_str(&stored).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_stored_zero_quantity_is_rejected() {
        assert!(serde_json::from_str::<Cart>(r#"{"a":0}"#).is_err());
        assert!(serde_json::from_str::<Cart>(r#"{"a":-1}"#).is_err());
    }

    #[test]
    fn test_lines_skip_items_missing_from_menu() {
        let mut cart = Cart::new();
        cart.add(&id("a"));
        cart.add(&id("a"));
        cart.add(&id("gone"));

        let menu = vec![menu_item("a", 899), menu_item("b", 499)];
        let lines = cart.lines(&menu);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].total, Money::from_cents(1798));
        assert_eq!(subtotal(&lines), Money::from_cents(1798));
    }

    #[test]
    fn test_line_serializes_for_checkout() {
        let line = CartLine::new(&menu_item("a", 899), 2);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "menuItemId": "a",
                "title": "Item a",
                "price": 899,
                "quantity": 2,
                "total": 1798
            })
        );
    }
}
