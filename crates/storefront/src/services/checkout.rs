//! Checkout flow persistence.
//!
//! The sequencer lives in the session from the moment checkout opens until it
//! is closed. Nothing about the flow outlives the session.

use cornerstore_core::CheckoutSequencer;
use tower_sessions::Session;
use tracing::warn;

use crate::models::session_keys;

/// Load the open checkout flow, if any.
///
/// An unreadable record is treated as no flow at all.
pub async fn load_checkout(session: &Session) -> Option<CheckoutSequencer> {
    match session.get::<CheckoutSequencer>(session_keys::CHECKOUT).await {
        Ok(sequencer) => sequencer,
        Err(e) => {
            warn!(error = %e, "Discarding unreadable checkout state");
            None
        }
    }
}

/// Store the checkout flow.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store_checkout(
    session: &Session,
    sequencer: &CheckoutSequencer,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CHECKOUT, sequencer).await
}

/// Drop the checkout flow.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn discard_checkout(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CheckoutSequencer>(session_keys::CHECKOUT)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use cornerstore_core::CheckoutStage;
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_store_load_discard() {
        let session = session();
        assert!(load_checkout(&session).await.is_none());

        let mut sequencer = CheckoutSequencer::default();
        sequencer.continue_to_shipping().unwrap();
        store_checkout(&session, &sequencer).await.unwrap();

        let loaded = load_checkout(&session).await.unwrap();
        assert_eq!(loaded.stage(), CheckoutStage::Shipping);
        assert_eq!(loaded, sequencer);

        discard_checkout(&session).await.unwrap();
        assert!(load_checkout(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_record_is_ignored() {
        let session = session();
        session
            .insert(session_keys::CHECKOUT, "not a sequencer")
            .await
            .unwrap();
        assert!(load_checkout(&session).await.is_none());
    }
}
