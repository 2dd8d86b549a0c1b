//! Background cart writer.
//!
//! Mutations publish the new cart into a `watch` channel and return at once.
//! A single writer task picks up the newest published snapshot and writes it
//! to the store. The channel only ever holds one value, so snapshots published
//! while a write is in flight collapse into the latest one: the backlog is
//! bounded to one pending cart and writes land in publish order.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, instrument};

use crate::cart::Cart;
use crate::error::CartError;
use crate::store::KeyValueStore;

/// A cart waiting to be written, tagged with its publish sequence number.
#[derive(Debug, Clone)]
struct Pending {
    generation: u64,
    cart: Cart,
}

/// Handle to the writer task.
///
/// Dropping the handle closes the channel; the task then exits after its
/// current write. Call [`PersistHandle::flush`] first if the last snapshot
/// must reach storage.
#[derive(Debug)]
pub(crate) struct PersistHandle {
    pending: watch::Sender<Pending>,
    written: watch::Receiver<u64>,
}

impl PersistHandle {
    /// Spawn the writer task for `key` on the current tokio runtime.
    ///
    /// `initial` is treated as already stored.
    pub(crate) fn spawn(store: Arc<dyn KeyValueStore>, key: String, initial: Cart) -> Self {
        let (pending, pending_rx) = watch::channel(Pending {
            generation: 0,
            cart: initial,
        });
        let (written_tx, written) = watch::channel(0);

        tokio::spawn(run(store, key, pending_rx, written_tx));

        Self { pending, written }
    }

    /// Queue `cart` to be written. Never waits.
    pub(crate) fn schedule(&self, cart: Cart) {
        self.pending.send_modify(|pending| {
            pending.generation += 1;
            pending.cart = cart;
        });
    }

    /// Wait until the most recently scheduled cart has been handed to the store.
    ///
    /// Completes once the write was attempted, whether or not it succeeded.
    /// Returns immediately if the writer task is gone.
    pub(crate) async fn flush(&self) {
        let target = self.pending.borrow().generation;
        let mut written = self.written.clone();
        if written.wait_for(|done| *done >= target).await.is_err() {
            debug!(generation = target, "Cart writer stopped before flush completed");
        }
    }
}

#[instrument(skip_all, fields(key = %key))]
async fn run(
    store: Arc<dyn KeyValueStore>,
    key: String,
    mut pending: watch::Receiver<Pending>,
    written: watch::Sender<u64>,
) {
    debug!("Cart writer started");
    while pending.changed().await.is_ok() {
        let Pending { generation, cart } = pending.borrow_and_update().clone();

        match write(store.as_ref(), &key, &cart).await {
            Ok(()) => debug!(generation, items = cart.len(), "Persisted cart"),
            Err(e) => error!(generation, error = %e, "Failed to persist cart"),
        }

        written.send_replace(generation);
    }
    debug!("Cart writer stopped");
}

async fn write(store: &dyn KeyValueStore, key: &str, cart: &Cart) -> Result<(), CartError> {
    let json = cart.to_json()?;
    store.set(key, &json).await?;
    Ok(())
}
