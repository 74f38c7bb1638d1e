//! Domain models for storefront.
//!
//! Catalog, cart and checkout types come from `cornerstore_core`; this module
//! only holds what is specific to the HTTP session.

pub mod session;

pub use session::keys as session_keys;
