//! Core types for Go Marketplace.
//!
//! This module provides type-safe wrappers for common cart concepts.

pub mod cart_item;
pub mod id;
pub mod price;
pub mod quantity;

pub use cart_item::{CartItem, NewCartItem};
pub use id::*;
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError};
