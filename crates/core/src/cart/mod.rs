//! Shopping cart ledger.
//!
//! The ledger is an explicit value owned by whoever handles the current
//! action. It is hydrated from a [`CartRepository`] and written back after
//! every mutation, so callers never have to remember to persist it.

mod entry;
mod ledger;
mod repository;

pub use entry::CartEntry;
pub use ledger::CartLedger;
pub use repository::{
    CART_STORAGE_KEY, CartRepository, KeyValueCartRepository, KeyValueStore, MemoryStore,
    StoreError,
};
