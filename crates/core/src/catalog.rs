//! Catalog records and the listing filter.
//!
//! Products come from an external catalog and are treated as immutable
//! snapshots. The filter is a stateless predicate chain that turns the
//! catalog into the list shown to the shopper.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Price, ProductId};

/// A product as supplied by the catalog source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub rating: Rating,
    /// Image URL.
    pub image: String,
    pub category: String,
}

/// Aggregate review score for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average score, 0 to 5.
    pub rate: f64,
    /// Number of reviews.
    pub count: u32,
}

/// Listing filter, usually deserialized from the catalog page's query string.
///
/// Every predicate is skipped when its field is unset, zero or empty, so the
/// default filter matches the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductFilter {
    /// Case-insensitive substring of the title or description.
    pub search: String,
    #[serde(deserialize_with = "empty_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(deserialize_with = "empty_as_none")]
    pub max_price: Option<Decimal>,
    #[serde(deserialize_with = "empty_as_none")]
    pub min_rating: Option<f64>,
    /// Exact category label.
    pub category: String,
}

impl ProductFilter {
    /// Returns `true` if no predicate is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.active_min_price().is_none()
            && self.active_max_price().is_none()
            && self.active_min_rating().is_none()
            && self.category.is_empty()
    }

    /// Returns `true` if the product passes every active predicate.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let search = self.search.trim();
        if !search.is_empty() {
            let needle = search.to_lowercase();
            if !product.title.to_lowercase().contains(&needle)
                && !product.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if let Some(min) = self.active_min_price()
            && product.price.amount() < min
        {
            return false;
        }

        if let Some(max) = self.active_max_price()
            && product.price.amount() > max
        {
            return false;
        }

        if let Some(min) = self.active_min_rating()
            && product.rating.rate < min
        {
            return false;
        }

        self.category.is_empty() || product.category == self.category
    }

    /// Apply the filter, preserving catalog order.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products
            .iter()
            .filter(|product| self.matches(product))
            .cloned()
            .collect()
    }

    fn active_min_price(&self) -> Option<Decimal> {
        self.min_price.filter(|v| *v > Decimal::ZERO)
    }

    fn active_max_price(&self) -> Option<Decimal> {
        self.max_price.filter(|v| *v > Decimal::ZERO)
    }

    fn active_min_rating(&self) -> Option<f64> {
        self.min_rating.filter(|v| *v > 0.0)
    }
}

/// Distinct category labels in first-seen order.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !seen.iter().any(|c| c == &product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

/// HTML forms submit untouched number inputs as `""`.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}
