//! Session-related types.
//!
//! The session record is the storefront's key-value store: the cart blob and
//! the in-flight checkout live under fixed keys.

/// Session keys for storefront state.
pub mod keys {
    /// Key for the serialized cart entries (a JSON array string).
    pub const CART: &str = cornerstore_core::cart::CART_STORAGE_KEY;

    /// Key for the checkout sequencer while the flow is open.
    pub const CHECKOUT: &str = "checkout";
}

#[cfg(test)]
mod tests {
    use super::keys;

    #[test]
    fn test_cart_key_matches_ledger_key() {
        assert_eq!(keys::CART, "cart-storage");
        assert_ne!(keys::CART, keys::CHECKOUT);
    }
}
