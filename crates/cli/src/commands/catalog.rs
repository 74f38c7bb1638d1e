//! Catalog browsing commands.
//!
//! Reads `CATALOG_URL` the same way the storefront does.

use cornerstore_core::{ProductFilter, catalog};
use cornerstore_storefront::catalog::CatalogClient;
use cornerstore_storefront::config::CatalogConfig;
use tracing::info;

/// Build a catalog client from the environment.
///
/// # Errors
///
/// Returns an error if `CATALOG_URL` or `CATALOG_CACHE_TTL_SECS` is invalid.
pub fn client() -> Result<CatalogClient, Box<dyn std::error::Error>> {
    let config = CatalogConfig::from_env()?;
    info!(url = %config.url, "Using catalog");
    Ok(CatalogClient::new(&config))
}

/// Print the products matching `filter`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn list(filter: &ProductFilter) -> Result<(), Box<dyn std::error::Error>> {
    let products = client()?.fetch_products().await?;
    let visible = filter.apply(&products);

    for product in &visible {
        println!(
            "{:>4}  {:>10}  {:>3.1}  {:<18}  {}",
            product.id.to_string(),
            product.price.to_string(),
            product.rating.rate,
            product.category,
            product.title
        );
    }
    println!();
    println!("{} of {} products", visible.len(), products.len());

    Ok(())
}

/// Print the distinct category labels.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn categories() -> Result<(), Box<dyn std::error::Error>> {
    let products = client()?.fetch_products().await?;

    for category in catalog::categories(&products) {
        println!("{category}");
    }

    Ok(())
}
