//! The cart value.
//!
//! A [`Cart`] is an ordered list of [`CartItem`]s, unique by product ID, with
//! the most recently touched item first. Carts are immutable: every operation
//! builds a new list and leaves the original (and any snapshot a reader holds)
//! untouched. Cloning a cart is cheap since the list is shared behind an `Arc`.

use std::collections::HashSet;
use std::sync::Arc;

use go_marketplace_core::{CartItem, NewCartItem};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered, de-duplicated list of cart items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    items: Arc<[CartItem]>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Arc::from(Vec::new()),
        }
    }

    /// Build a cart from a list of items.
    ///
    /// If the list contains the same product more than once, only the first
    /// (most recent) entry is kept.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut seen = HashSet::with_capacity(items.len());
        let items: Vec<CartItem> = items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        Self {
            items: Arc::from(items),
        }
    }

    /// Items in display order, most recently touched first.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Shared read-only snapshot of the items.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[CartItem]> {
        Arc::clone(&self.items)
    }

    /// Look up an item by product ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id.as_str() == id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all item quantities, e.g. for a cart badge.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Add one unit of a product.
    ///
    /// An existing entry has its quantity bumped and moves to the front with
    /// its stored title, image and price left as they were. A new product is
    /// inserted at the front with quantity 1.
    #[must_use]
    pub fn add(&self, candidate: NewCartItem) -> Self {
        let front = match self.get(candidate.id.as_str()) {
            Some(existing) => existing.with_quantity(existing.quantity.incremented()),
            None => CartItem::from(candidate),
        };
        self.with_front(front)
    }

    /// Add one unit of an existing product and move it to the front.
    ///
    /// Returns `None` when the product is not in the cart.
    #[must_use]
    pub fn increment(&self, id: &str) -> Option<Self> {
        let existing = self.get(id)?;
        let front = existing.with_quantity(existing.quantity.incremented());
        Some(self.with_front(front))
    }

    /// Remove one unit of an existing product.
    ///
    /// The item moves to the front if units remain and is dropped from the
    /// cart when its last unit is removed. Returns `None` when the product is
    /// not in the cart.
    #[must_use]
    pub fn decrement(&self, id: &str) -> Option<Self> {
        let existing = self.get(id)?;
        Some(match existing.quantity.decremented() {
            Some(quantity) => self.with_front(existing.with_quantity(quantity)),
            None => self.without(id),
        })
    }

    /// Serialize to the persisted JSON array format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse the persisted JSON array format.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON array of valid cart items.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    fn with_front(&self, front: CartItem) -> Self {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(
            self.items
                .iter()
                .filter(|item| item.id != front.id)
                .cloned(),
        );
        items.insert(0, front);
        Self {
            items: Arc::from(items),
        }
    }

    fn without(&self, id: &str) -> Self {
        let items: Vec<CartItem> = self
            .items
            .iter()
            .filter(|item| item.id.as_str() != id)
            .cloned()
            .collect();
        Self {
            items: Arc::from(items),
        }
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<CartItem>::deserialize(deserializer).map(Self::from_items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use go_marketplace_core::{Price, Quantity};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn candidate(id: &str) -> NewCartItem {
        NewCartItem::new(
            id,
            format!("Product {id}"),
            format!("https://img/{id}.png"),
            Price::from_cents(1000).unwrap(),
        )
    }

    fn ids(cart: &Cart) -> Vec<&str> {
        cart.items().iter().map(|item| item.id.as_str()).collect()
    }

    fn quantity(cart: &Cart, id: &str) -> u32 {
        cart.get(id).unwrap().quantity.get()
    }

    #[test]
    fn test_add_new_item_goes_to_front_with_quantity_one() {
        let cart = Cart::new().add(candidate("a")).add(candidate("b"));
        assert_eq!(ids(&cart), ["b", "a"]);
        assert_eq!(quantity(&cart, "b"), 1);
    }

    #[test]
    fn test_add_existing_item_increments_and_moves_to_front() {
        let cart = Cart::new()
            .add(candidate("a"))
            .add(candidate("b"))
            .add(candidate("a"));
        assert_eq!(ids(&cart), ["a", "b"]);
        assert_eq!(quantity(&cart, "a"), 2);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_add_existing_keeps_stored_fields() {
        let cart = Cart::new().add(candidate("a"));
        let mut changed = candidate("a");
        changed.title = "Renamed".to_string();
        changed.price = Price::from_cents(1).unwrap();

        let cart = cart.add(changed);
        let item = cart.get("a").unwrap();
        assert_eq!(item.title, "Product a");
        assert_eq!(item.price, Price::from_cents(1000).unwrap());
        assert_eq!(item.quantity.get(), 2);
    }

    #[test]
    fn test_increment_missing_is_none() {
        let cart = Cart::new().add(candidate("a"));
        assert!(cart.increment("zzz").is_none());
        assert!(cart.decrement("zzz").is_none());
    }

    #[test]
    fn test_increment_moves_to_front() {
        let cart = Cart::new().add(candidate("a")).add(candidate("b"));
        let cart = cart.increment("a").unwrap();
        assert_eq!(ids(&cart), ["a", "b"]);
        assert_eq!(quantity(&cart, "a"), 2);
    }

    #[test]
    fn test_decrement_keeps_item_above_zero() {
        let cart = Cart::new()
            .add(candidate("a"))
            .add(candidate("a"))
            .add(candidate("b"));
        let cart = cart.decrement("a").unwrap();
        assert_eq!(ids(&cart), ["a", "b"]);
        assert_eq!(quantity(&cart, "a"), 1);
    }

    #[test]
    fn test_decrement_last_unit_removes_item() {
        let cart = Cart::new().add(candidate("a")).add(candidate("b"));
        let cart = cart.decrement("a").unwrap();
        assert_eq!(ids(&cart), ["b"]);
        assert!(cart.get("a").is_none());
    }

    #[test]
    fn test_operations_do_not_touch_original() {
        let original = Cart::new().add(candidate("a"));
        let snapshot = original.snapshot();
        let _ = original.increment("a").unwrap();
        let _ = original.decrement("a").unwrap();
        assert_eq!(snapshot[0].quantity, Quantity::ONE);
        assert_eq!(quantity(&original, "a"), 1);
    }

    #[test]
    fn test_total_quantity() {
        let cart = Cart::new()
            .add(candidate("a"))
            .add(candidate("a"))
            .add(candidate("b"));
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(Cart::new().total_quantity(), 0);
    }

    #[test]
    fn test_from_items_drops_duplicate_ids() {
        let first = CartItem::from(candidate("a")).with_quantity(Quantity::new(5).unwrap());
        let second = CartItem::from(candidate("a"));
        let cart = Cart::from_items(vec![first, second, CartItem::from(candidate("b"))]);
        assert_eq!(ids(&cart), ["a", "b"]);
        assert_eq!(quantity(&cart, "a"), 5);
    }

    #[test]
    fn test_json_roundtrip() {
        let cart = Cart::new()
            .add(candidate("a"))
            .add(candidate("b"))
            .add(candidate("a"));
        let json = cart.to_json().unwrap();
        assert!(json.starts_with('['));
        assert_eq!(Cart::from_json(&json).unwrap(), cart);
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        assert!(Cart::from_json("{\"id\":\"a\"}").is_err());
        assert!(Cart::from_json("not json").is_err());
    }

    #[test]
    fn test_random_operations_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(0x2545_f491);
        let pool = ["a", "b", "c", "d"];
        let mut cart = Cart::new();

        for _ in 0..2_000 {
            let id = pool[rng.random_range(0..pool.len())];
            cart = match rng.random_range(0..3) {
                0 => cart.add(candidate(id)),
                1 => cart.increment(id).unwrap_or(cart),
                _ => cart.decrement(id).unwrap_or(cart),
            };

            let mut seen = HashSet::new();
            for item in cart.items() {
                assert!(seen.insert(item.id.clone()), "duplicate id {}", item.id);
                assert!(item.quantity.get() >= 1);
            }
        }
    }
}
