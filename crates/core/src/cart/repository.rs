use std::collections::HashMap;

use thiserror::Error;

use super::CartEntry;

/// Fixed key the cart is stored under.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Errors from the persistence substrate.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be read or written.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The stored blob could not be encoded or decoded.
    #[error("malformed cart blob: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A string key-value store, the shape of browser local storage or a
/// session record.
pub trait KeyValueStore {
    /// Read the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the store cannot be written.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Load/save access to a persisted cart.
pub trait CartRepository {
    /// Load the stored entries. `Ok(None)` means nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the blob is malformed.
    fn load(&self) -> Result<Option<Vec<CartEntry>>, StoreError>;

    /// Replace the stored entries with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(&mut self, snapshot: &[CartEntry]) -> Result<(), StoreError>;
}

/// Stores the entry list as a JSON array under [`CART_STORAGE_KEY`].
#[derive(Debug, Clone, Default)]
pub struct KeyValueCartRepository<S> {
    store: S,
}

impl<S: KeyValueStore> KeyValueCartRepository<S> {
    /// Wrap a key-value store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the underlying store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: KeyValueStore> CartRepository for KeyValueCartRepository<S> {
    fn load(&self) -> Result<Option<Vec<CartEntry>>, StoreError> {
        match self.store.get(CART_STORAGE_KEY)? {
            Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, snapshot: &[CartEntry]) -> Result<(), StoreError> {
        let blob = serde_json::to_string(snapshot)?;
        self.store.set(CART_STORAGE_KEY, blob)
    }
}

/// In-process key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }
}
