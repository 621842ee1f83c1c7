//! Key-value persistence, modelled on browser local storage.
//!
//! The cart and the content cache each own a handful of named slots holding
//! serialized JSON. Implementations decide where the bytes live; the core
//! crate only ships [`MemoryStore`].

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Errors reported by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be used as a slot name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A synchronous string key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory store. Contents are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(key);
        Ok(())
    }
}
