//! Product catalog client.
//!
//! # Architecture
//!
//! - The catalog is an external JSON endpoint returning every product at once
//! - No local sync: the list is fetched on demand and held in a `moka` cache
//! - Listing pages degrade to an empty catalog when the source is down
//!
//! # Example
//!
//! ```rust,ignore
//! use cornerstore_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//! let catalog = client.load_catalog().await;
//! let visible = filter.apply(&catalog.products);
//! ```

mod client;

pub use client::{Catalog, CatalogClient};

use cornerstore_core::ProductId;
use thiserror::Error;

/// Errors that can occur when talking to the catalog source.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Catalog returned HTTP {status}")]
    Status { status: u16 },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No product with this id in the catalog.
    #[error("Product not found: {0}")]
    NotFound(ProductId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound(ProductId::new(7));
        assert_eq!(err.to_string(), "Product not found: 7");

        let err = CatalogError::Status { status: 503 };
        assert_eq!(err.to_string(), "Catalog returned HTTP 503");
    }
}
