//! Session-backed cart persistence.
//!
//! The ledger talks to a synchronous [`KeyValueStore`]; the session is async.
//! [`SessionKeyValues`] bridges the two by snapshotting the keys a request
//! needs up front, buffering writes, and flushing them back once the handler
//! is done mutating.

use std::collections::{BTreeSet, HashMap};

use cornerstore_core::CartLedger;
use cornerstore_core::cart::{KeyValueCartRepository, KeyValueStore, StoreError};
use tower_sessions::Session;
use tracing::{debug, warn};

use crate::models::session_keys;

/// Cart ledger persisted in the visitor's session.
pub type SessionCart = CartLedger<KeyValueCartRepository<SessionKeyValues>>;

/// Buffered key-value view over a session.
#[derive(Debug, Default)]
pub struct SessionKeyValues {
    values: HashMap<String, String>,
    dirty: BTreeSet<String>,
    /// Set when the snapshot could not be read.
    unavailable: Option<String>,
}

impl SessionKeyValues {
    /// Snapshot `keys` from the session.
    ///
    /// Read failures are remembered and reported by [`KeyValueStore::get`],
    /// so the ledger can fall back to an empty cart.
    pub async fn prefetch(session: &Session, keys: &[&str]) -> Self {
        let mut store = Self::default();
        for key in keys {
            match session.get::<String>(key).await {
                Ok(Some(value)) => {
                    store.values.insert((*key).to_string(), value);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(key, error = %e, "Failed to read session value");
                    store.unavailable = Some(e.to_string());
                }
            }
        }
        store
    }

    /// `true` if a write is waiting to be flushed.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Write buffered values back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session rejects an insert.
    pub async fn flush(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        for key in &self.dirty {
            if let Some(value) = self.values.get(key) {
                session.insert(key, value).await?;
            }
        }
        debug!(keys = self.dirty.len(), "Flushed session values");
        Ok(())
    }
}

impl KeyValueStore for SessionKeyValues {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(reason) = &self.unavailable {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.dirty.insert(key.to_string());
        Ok(())
    }
}

/// Hydrate the visitor's cart from the session.
pub async fn load_cart(session: &Session) -> SessionCart {
    let store = SessionKeyValues::prefetch(session, &[session_keys::CART]).await;
    CartLedger::load(KeyValueCartRepository::new(store))
}

/// Write the cart's pending changes back to the session.
///
/// Failures are logged and swallowed: the cart the visitor just saw stays
/// correct for this response even if it will not survive the next one.
pub async fn save_cart(session: &Session, cart: SessionCart) {
    let store = cart.into_repository().into_store();
    if !store.is_dirty() {
        return;
    }
    if let Err(e) = store.flush(session).await {
        warn!(error = %e, "Failed to persist cart to session");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use cornerstore_core::{Price, Product, ProductId, Rating};
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: String::new(),
            price: Price::from_cents(cents),
            rating: Rating {
                rate: 4.0,
                count: 1,
            },
            image: String::new(),
            category: "misc".to_string(),
        }
    }

    #[tokio::test]
    async fn test_cart_round_trips_through_session() {
        let session = session();

        let mut cart = load_cart(&session).await;
        assert!(cart.is_empty());
        cart.add_item(&product(1, 1000));
        cart.add_item(&product(1, 1000));
        cart.add_item(&product(2, 250));
        save_cart(&session, cart).await;

        let blob: String = session.get(session_keys::CART).await.unwrap().unwrap();
        assert!(blob.starts_with('['));

        let cart = load_cart(&session).await;
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), Price::from_cents(2250));
    }

    #[tokio::test]
    async fn test_untouched_cart_is_not_written() {
        let session = session();
        let cart = load_cart(&session).await;
        save_cart(&session, cart).await;

        let blob: Option<String> = session.get(session_keys::CART).await.unwrap();
        assert!(blob.is_none());
    }

    #[tokio::test]
    async fn test_malformed_blob_starts_empty() {
        let session = session();
        session
            .insert(session_keys::CART, "[{\"id\": 1")
            .await
            .unwrap();

        let cart = load_cart(&session).await;
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_non_string_value_reports_unavailable() {
        let session = session();
        session.insert(session_keys::CART, 42).await.unwrap();

        let store = SessionKeyValues::prefetch(&session, &[session_keys::CART]).await;
        assert!(matches!(
            store.get(session_keys::CART),
            Err(StoreError::Unavailable(_))
        ));
    }
}
