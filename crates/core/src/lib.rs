//! Corner Store Core - domain types and state machines.
//!
//! This crate provides everything the storefront and CLI share:
//! - `storefront` - Public-facing shop (catalog, cart, checkout)
//! - `cli` - Command-line catalog browser and local cart
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure state transitions - no
//! network access and no async runtime. Persistence is reached through the
//! [`cart::KeyValueStore`] trait, which callers implement over whatever
//! storage they have (session record, files, memory).
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices
//! - [`catalog`] - Product records and the listing filter
//! - [`cart`] - Cart ledger and its repository
//! - [`checkout`] - Checkout stages, forms and the sequencer

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use cart::{CartEntry, CartLedger};
pub use catalog::{Product, ProductFilter, Rating};
pub use checkout::{CheckoutError, CheckoutSequencer, CheckoutStage};
pub use types::*;
