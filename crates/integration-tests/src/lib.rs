//! Integration tests for Go Marketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p go-marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - End-to-end cart flows through a session
//! - `cart_persistence` - Hydration and write-back against file and memory stores
//! - `cart_invariants` - Invariants under long random operation sequences
//!
//! This library holds the fixtures shared by those test files.

#![cfg_attr(not(test), forbid(unsafe_code))]

use go_marketplace_cart::{Cart, MemoryStore};
use go_marketplace_core::{NewCartItem, Price};

/// Storage key used by test sessions.
pub const TEST_KEY: &str = "@GoMarketplace:cart-products";

/// Build a cart candidate with a whole-dollar price.
///
/// # Panics
///
/// Panics if `dollars` is negative.
#[must_use]
#[allow(clippy::expect_used)]
pub fn product(id: &str, title: &str, dollars: i64) -> NewCartItem {
    let price = Price::from_cents(dollars * 100).expect("test prices are non-negative");
    NewCartItem::new(id, title, "u", price)
}

/// Parse whatever is currently stored under [`TEST_KEY`].
///
/// # Panics
///
/// Panics if nothing is stored or the stored value is not a valid cart.
#[allow(clippy::expect_used)]
pub async fn stored_cart(store: &MemoryStore) -> Cart {
    let raw = store.peek(TEST_KEY).await.expect("cart was persisted");
    Cart::from_json(&raw).expect("persisted cart is valid")
}

/// `(id, quantity)` pairs in cart order.
#[must_use]
pub fn lines(cart: &Cart) -> Vec<(String, u32)> {
    cart.items()
        .iter()
        .map(|item| (item.id.to_string(), item.quantity.get()))
        .collect()
}
