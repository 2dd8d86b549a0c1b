//! The cart store: authoritative in-memory cart plus best-effort persistence.

use std::sync::Arc;

use go_marketplace_core::{CartItem, NewCartItem};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::cart::Cart;
use crate::error::{CartError, Result};
use crate::persist::PersistHandle;
use crate::store::KeyValueStore;

/// Cloneable handle to a shopper's cart.
///
/// All clones share one cart. Mutations are serialized: each one reads the
/// current cart, builds the next one and publishes it under a single lock, so
/// concurrent calls never lose an update. Reads always see the latest
/// mutation; the write to storage happens afterwards in the background and
/// its failure never affects the in-memory cart.
///
/// Must be created inside a tokio runtime, since it spawns the writer task.
#[derive(Debug, Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

#[derive(Debug)]
struct CartStoreInner {
    key: String,
    state: watch::Sender<Cart>,
    writer: PersistHandle,
}

impl CartStore {
    /// Load the cart stored under `key` and start the background writer.
    ///
    /// Performs exactly one read. A missing value gives an empty cart. A read
    /// failure or an unparseable value is logged and also gives an empty
    /// cart; the bad value is overwritten by the first mutation.
    #[instrument(skip(store))]
    pub async fn initialize(store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        let cart = match load(store.as_ref(), key).await {
            Ok(Some(cart)) => {
                info!(items = cart.len(), "Restored stored cart");
                cart
            }
            Ok(None) => {
                debug!("No stored cart, starting empty");
                Cart::new()
            }
            Err(e) => {
                warn!(error = %e, "Could not restore stored cart, starting empty");
                Cart::new()
            }
        };

        let writer = PersistHandle::spawn(store, key.to_owned(), cart.clone());
        let (state, _) = watch::channel(cart);

        Self {
            inner: Arc::new(CartStoreInner {
                key: key.to_owned(),
                state,
                writer,
            }),
        }
    }

    /// Current items, most recently touched first.
    #[must_use]
    pub fn products(&self) -> Arc<[CartItem]> {
        self.inner.state.borrow().snapshot()
    }

    /// Current cart value.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.state.borrow().clone()
    }

    /// Receive every new cart as it is published.
    ///
    /// The receiver starts out having seen the current cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.state.subscribe()
    }

    /// Storage key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    /// Add one unit of `item`, inserting it if it is not in the cart yet.
    pub fn add_to_cart(&self, item: NewCartItem) {
        let id = item.id.clone();
        self.apply("add_to_cart", id.as_str(), |cart| Some(cart.add(item)));
    }

    /// Add one unit of a product already in the cart.
    ///
    /// Returns `false` and changes nothing if the product is not in the cart.
    pub fn increment(&self, id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        self.apply("increment", id, |cart| cart.increment(id))
    }

    /// Remove one unit of a product, dropping it when none remain.
    ///
    /// Returns `false` and changes nothing if the product is not in the cart.
    pub fn decrement(&self, id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        self.apply("decrement", id, |cart| cart.decrement(id))
    }

    /// Wait for the most recent mutation's write to finish.
    ///
    /// Never needed for reads. Used before shutdown so the last change
    /// reaches storage.
    pub async fn flush(&self) {
        self.inner.writer.flush().await;
    }

    fn apply(&self, op: &'static str, id: &str, f: impl FnOnce(&Cart) -> Option<Cart>) -> bool {
        let writer = &self.inner.writer;
        let changed = self.inner.state.send_if_modified(|cart| match f(&*cart) {
            Some(next) => {
                // Scheduled under the state lock so writes follow mutation order.
                writer.schedule(next.clone());
                *cart = next;
                true
            }
            None => false,
        });

        if changed {
            debug!(op, product_id = id, "Cart updated");
        } else {
            debug!(op, product_id = id, "Product not in cart, nothing to do");
        }
        changed
    }
}

/// Read and parse the cart stored under `key`.
///
/// # Errors
///
/// Returns [`CartError::Store`] if the read fails and
/// [`CartError::Hydration`] if the stored value is not a valid cart.
pub async fn load(store: &dyn KeyValueStore, key: &str) -> Result<Option<Cart>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    Cart::from_json(&raw)
        .map(Some)
        .map_err(|e| CartError::Hydration(e.to_string()))
}
