//! Go Marketplace cart library.
//!
//! Holds the shopper's cart in memory and mirrors it to an on-device
//! key-value store on a best-effort basis.
//!
//! # Architecture
//!
//! - [`Cart`] - immutable cart value; every operation returns a new cart
//! - [`CartStore`] - cloneable handle owning the authoritative cart, serializing
//!   mutations and handing snapshots to a background writer
//! - [`CartSession`] - explicit session lifecycle; accessing the cart outside a
//!   started session fails with [`CartError::NotInitialized`]
//! - [`store`] - the [`KeyValueStore`] trait plus in-memory and file backends
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), go_marketplace_cart::CartError> {
//! use std::sync::Arc;
//!
//! use go_marketplace_cart::{CartConfig, CartSession, MemoryStore};
//! use go_marketplace_core::{NewCartItem, Price};
//!
//! let session = CartSession::new();
//! session
//!     .start(Arc::new(MemoryStore::new()), &CartConfig::default())
//!     .await?;
//!
//! let cart = session.cart()?;
//! cart.add_to_cart(NewCartItem::new("a", "Shoe", "https://img/a.png", Price::from_cents(1000).unwrap()));
//! cart.increment("a");
//! assert_eq!(cart.products()[0].quantity.get(), 2);
//!
//! session.end().await;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod cart_store;
pub mod config;
pub mod error;
mod persist;
pub mod session;
pub mod store;

pub use cart::Cart;
pub use cart_store::CartStore;
pub use config::{CartConfig, ConfigError, LogFormat};
pub use error::CartError;
pub use session::CartSession;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
