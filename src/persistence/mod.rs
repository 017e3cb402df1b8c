//! Cart persistence
//!
//! Mirrors the cart into key-value storage after every mutation and reads it
//! back once at session start. Best effort in both directions: a failed write
//! is logged and the in-memory cart stays authoritative, and anything that
//! cannot be read back yields an empty cart.

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    cart::LineItem,
    persistence::records::LineItemRecord,
    storage::{KeyValueStore, StorageError},
};

mod records;

/// Key the cart snapshot is stored under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Reads and writes cart snapshots through a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct CartPersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Persist under [`CART_STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, CART_STORAGE_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write the snapshot. Returns whether the write succeeded; failures are logged.
    pub fn save(&mut self, items: &[LineItem]) -> bool {
        let records: Vec<LineItemRecord> = items.iter().map(LineItemRecord::from).collect();

        let bytes = match serde_json::to_vec(&records) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(key = %self.key, %error, "failed to encode cart snapshot");
                return false;
            }
        };

        match self.store.set(&self.key, &bytes) {
            Ok(()) => {
                debug!(key = %self.key, lines = items.len(), "saved cart snapshot");
                true
            }
            Err(error) => {
                warn!(key = %self.key, %error, "failed to save cart snapshot");
                false
            }
        }
    }

    /// Read the snapshot back.
    ///
    /// Returns an empty cart when the key is absent, the value is not a JSON
    /// array, or storage is unavailable. Lines that are malformed are dropped,
    /// duplicate products are merged, and every line total is recomputed.
    pub fn load(&self) -> Vec<LineItem> {
        let bytes = match self.store.get(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key = %self.key, "no stored cart");
                return Vec::new();
            }
            Err(StorageError::Unavailable) => {
                debug!(key = %self.key, "storage unavailable, starting with an empty cart");
                return Vec::new();
            }
            Err(error) => {
                warn!(key = %self.key, %error, "failed to read stored cart");
                return Vec::new();
            }
        };

        let values = match serde_json::from_slice::<Vec<Value>>(&bytes) {
            Ok(values) => values,
            Err(error) => {
                warn!(key = %self.key, %error, "stored cart is corrupt, discarding it");
                return Vec::new();
            }
        };

        let mut items: Vec<LineItem> = Vec::with_capacity(values.len());

        for (idx, value) in values.into_iter().enumerate() {
            let record = match serde_json::from_value::<LineItemRecord>(value) {
                Ok(record) => record,
                Err(error) => {
                    warn!(key = %self.key, idx, %error, "dropping unreadable stored cart line");
                    continue;
                }
            };

            match LineItem::try_from(record) {
                Ok(line) => merge_line(&mut items, line),
                Err(error) => {
                    warn!(key = %self.key, idx, %error, "dropping invalid stored cart line");
                }
            }
        }

        debug!(key = %self.key, lines = items.len(), "loaded cart snapshot");

        items
    }

    /// Remove the snapshot. Returns whether the removal succeeded; failures are logged.
    pub fn clear(&mut self) -> bool {
        match self.store.remove(&self.key) {
            Ok(()) => true,
            Err(error) => {
                warn!(key = %self.key, %error, "failed to remove cart snapshot");
                false
            }
        }
    }
}

/// Fold a loaded line into the cart, merging repeated products.
fn merge_line(items: &mut Vec<LineItem>, line: LineItem) {
    if let Some(existing) = items
        .iter_mut()
        .find(|existing| existing.product_id() == line.product_id())
    {
        match existing.quantity().checked_add(line.quantity()) {
            Ok(quantity) => existing.set_quantity(quantity),
            Err(error) => {
                warn!(product_id = %line.product_id(), %error, "dropping duplicate stored cart line");
            }
        }
    } else {
        items.push(line);
    }
}
