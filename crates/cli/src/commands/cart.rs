//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! cart-cli add --id a --title "Shoe" --image-url https://img/a.png --price 10
//! cart-cli increment a
//! cart-cli decrement a
//! cart-cli list
//! ```
//!
//! # Environment Variables
//!
//! - `CART_DATA_DIR` - Directory holding the cart file
//! - `CART_STORAGE_KEY` - Key of the cart within that directory

use std::fmt::Write as _;

use go_marketplace_cart::{Cart, CartStore};
use go_marketplace_core::{NewCartItem, Price, PriceError};
use thiserror::Error;
use tracing::info;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The price argument is not a valid non-negative decimal.
    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// The product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(String),

    /// The cart could not be rendered as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if `json` is set and serialization fails.
pub fn list(cart: &CartStore, json: bool) -> Result<(), CommandError> {
    let snapshot = cart.cart();
    let output = if json {
        snapshot.to_json()?
    } else {
        render_table(&snapshot)
    };
    print_output(&output);
    Ok(())
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if `price` is not a valid price.
pub fn add(
    cart: &CartStore,
    id: String,
    title: String,
    image_url: String,
    price: &str,
) -> Result<(), CommandError> {
    let price: Price = price.parse()?;
    cart.add_to_cart(NewCartItem::new(id.as_str(), title, image_url, price));

    let quantity = cart.cart().get(&id).map_or(0, |item| item.quantity.get());
    info!(product_id = %id, quantity, "Added to cart");
    Ok(())
}

/// Add one unit of a product already in the cart.
///
/// # Errors
///
/// Returns [`CommandError::NotInCart`] if the product is not in the cart.
pub fn increment(cart: &CartStore, id: &str) -> Result<(), CommandError> {
    if !cart.increment(id) {
        return Err(CommandError::NotInCart(id.to_string()));
    }
    info!(product_id = %id, "Incremented");
    Ok(())
}

/// Remove one unit of a product.
///
/// # Errors
///
/// Returns [`CommandError::NotInCart`] if the product is not in the cart.
pub fn decrement(cart: &CartStore, id: &str) -> Result<(), CommandError> {
    if !cart.decrement(id) {
        return Err(CommandError::NotInCart(id.to_string()));
    }
    match cart.cart().get(id) {
        Some(item) => info!(product_id = %id, quantity = item.quantity.get(), "Decremented"),
        None => info!(product_id = %id, "Removed from cart"),
    }
    Ok(())
}

/// Render the cart as a plain-text table.
fn render_table(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {:<32} {:>10} {:>5}", "ID", "TITLE", "PRICE", "QTY");
    for item in cart.items() {
        let _ = writeln!(
            out,
            "{:<16} {:<32} {:>10} {:>5}",
            item.id,
            item.title,
            item.price.display(),
            item.quantity
        );
    }
    let _ = write!(
        out,
        "{} product(s), {} item(s)",
        cart.len(),
        cart.total_quantity()
    );
    out
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    println!("{output}");
}
