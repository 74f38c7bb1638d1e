//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Cart ledger persisted in the session
//! - `checkout` - Checkout flow state held in the session
//! - `payment` - Simulated payment settlement

pub mod cart;
pub mod checkout;
pub mod payment;

pub use cart::{SessionCart, SessionKeyValues, load_cart, save_cart};
pub use checkout::{discard_checkout, load_checkout, store_checkout};
pub use payment::PaymentProcessor;
