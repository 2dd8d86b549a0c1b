//! Cart session lifecycle.
//!
//! A [`CartSession`] is created by the app shell and handed to whatever needs
//! the cart. The cart only exists between [`CartSession::start`] and
//! [`CartSession::end`]; asking for it outside that window is a wiring bug and
//! fails with [`CartError::NotInitialized`] instead of quietly returning an
//! empty cart.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, instrument, warn};

use crate::cart_store::CartStore;
use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::store::KeyValueStore;

/// Shared slot holding the cart for the current session.
#[derive(Debug, Clone, Default)]
pub struct CartSession {
    slot: Arc<RwLock<Option<CartStore>>>,
}

impl CartSession {
    /// Create a session that has not been started.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate the cart from `store` and make it available through [`Self::cart`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AlreadyStarted`] if the session is already running.
    #[instrument(skip_all, fields(key = %config.storage_key))]
    pub async fn start(
        &self,
        store: Arc<dyn KeyValueStore>,
        config: &CartConfig,
    ) -> Result<CartStore> {
        if self.is_active() {
            return Err(CartError::AlreadyStarted);
        }

        let cart = CartStore::initialize(store, &config.storage_key).await;

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            warn!("Cart session was started concurrently; keeping the first one");
            return Err(CartError::AlreadyStarted);
        }
        *slot = Some(cart.clone());
        drop(slot);

        info!(items = cart.products().len(), "Cart session started");
        Ok(cart)
    }

    /// Get the session's cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInitialized`] if the session has not been
    /// started or has already ended.
    pub fn cart(&self) -> Result<CartStore> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(CartError::NotInitialized)
    }

    /// Whether the session is currently running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// End the session, waiting for the last cart change to be written.
    ///
    /// Handles obtained earlier keep working in memory, but the session no
    /// longer hands them out. Ending a session that is not running does nothing.
    #[instrument(skip_all)]
    pub async fn end(&self) {
        let cart = self
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(cart) = cart {
            cart.flush().await;
            info!("Cart session ended");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use go_marketplace_core::{NewCartItem, Price};

    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_cart_before_start_fails_fast() {
        let session = CartSession::new();
        assert!(!session.is_active());
        assert!(matches!(session.cart(), Err(CartError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_start_then_cart() {
        let session = CartSession::new();
        let started = session
            .start(Arc::new(MemoryStore::new()), &CartConfig::default())
            .await
            .unwrap();

        started.add_to_cart(NewCartItem::new("a", "Shoe", "u", Price::from_cents(1000).unwrap()));

        // Clones of the session share the same cart.
        let from_session = session.clone().cart().unwrap();
        assert_eq!(from_session.products().len(), 1);
    }

    #[tokio::test]
    async fn test_start_twice_is_rejected() {
        let session = CartSession::new();
        let config = CartConfig::default();
        session
            .start(Arc::new(MemoryStore::new()), &config)
            .await
            .unwrap();

        assert!(matches!(
            session.start(Arc::new(MemoryStore::new()), &config).await,
            Err(CartError::AlreadyStarted)
        ));
    }

    #[tokio::test]
    async fn test_end_flushes_and_clears() {
        let store = Arc::new(MemoryStore::new());
        let config = CartConfig::default();
        let session = CartSession::new();
        let cart = session.start(store.clone(), &config).await.unwrap();

        cart.add_to_cart(NewCartItem::new("a", "Shoe", "u", Price::from_cents(1000).unwrap()));
        session.end().await;

        assert!(matches!(session.cart(), Err(CartError::NotInitialized)));
        assert!(store.peek(&config.storage_key).await.is_some());

        // A new session restores what the previous one wrote.
        let restored = session.start(store, &config).await.unwrap();
        assert_eq!(restored.products().len(), 1);
    }

    #[tokio::test]
    async fn test_end_without_start_is_noop() {
        CartSession::new().end().await;
    }
}
