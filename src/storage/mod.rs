//! Key-value storage
//!
//! The boundary the cart is mirrored into. Implementations give no
//! transactional guarantees and may be missing entirely.

use std::io;

use thiserror::Error;

pub mod file;
pub mod memory;
pub mod unavailable;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use unavailable::UnavailableStore;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The environment has no storage capability.
    #[error("Storage is unavailable")]
    Unavailable,

    /// Writing the value would exceed the storage quota.
    #[error("Storing {size} bytes under {key:?} exceeds the {limit} byte quota")]
    QuotaExceeded {
        /// Key being written
        key: String,
        /// Size of the rejected value in bytes
        size: usize,
        /// Quota in bytes
        limit: usize,
    },

    /// The key cannot be stored by this backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// IO error from a file-backed store.
    #[error("Storage IO error: {0}")]
    Io(#[from] io::Error),
}

/// String-keyed byte storage.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value cannot be written.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
