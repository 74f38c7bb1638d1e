//! Catalog listing route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::Uri,
    response::IntoResponse,
};
use cornerstore_core::{Product, ProductFilter, catalog};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::services::load_cart;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub category: String,
    pub rate: f64,
    pub review_count: u32,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            category: product.category.clone(),
            rate: product.rating.rate,
            review_count: product.rating.count,
        }
    }
}

/// Filter form values, echoed back into the inputs.
#[derive(Clone, Default)]
pub struct FilterView {
    pub search: String,
    pub min_price: String,
    pub max_price: String,
    pub min_rating: String,
    pub category: String,
    pub active: bool,
}

impl From<&ProductFilter> for FilterView {
    fn from(filter: &ProductFilter) -> Self {
        Self {
            search: filter.search.clone(),
            min_price: filter.min_price.map(|v| v.to_string()).unwrap_or_default(),
            max_price: filter.max_price.map(|v| v.to_string()).unwrap_or_default(),
            min_rating: filter.min_rating.map(|v| v.to_string()).unwrap_or_default(),
            category: filter.category.clone(),
            active: !filter.is_empty(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub total_count: usize,
    pub categories: Vec<String>,
    pub filter: FilterView,
    pub catalog_available: bool,
    /// Where add-to-cart should send the shopper back to.
    pub return_to: String,
    pub cart_count: u32,
}

/// Display the filtered catalog.
///
/// A malformed query string falls back to the unfiltered listing.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    uri: Uri,
    filter: Result<Query<ProductFilter>, QueryRejection>,
) -> impl IntoResponse {
    let filter = filter.map(|Query(f)| f).unwrap_or_default();
    let catalog = state.catalog().load_catalog().await;
    let cart = load_cart(&session).await;

    let visible = filter.apply(&catalog.products);
    tracing::debug!(
        shown = visible.len(),
        total = catalog.products.len(),
        "Catalog filtered"
    );

    ProductsIndexTemplate {
        products: visible.iter().map(ProductView::from).collect(),
        total_count: catalog.products.len(),
        categories: catalog::categories(&catalog.products),
        filter: FilterView::from(&filter),
        catalog_available: catalog.available,
        return_to: uri
            .path_and_query()
            .map_or_else(|| "/".to_string(), ToString::to_string),
        cart_count: cart.item_count(),
    }
}

#[cfg(test)]
mod tests {
    use cornerstore_core::{Price, ProductId, Rating};
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_product_view_formats_price() {
        let product = Product {
            id: ProductId::new(3),
            title: "Jacket".to_string(),
            description: "Warm".to_string(),
            price: Price::from_cents(5599),
            rating: Rating {
                rate: 4.7,
                count: 500,
            },
            image: "https://img.example/3.jpg".to_string(),
            category: "men's clothing".to_string(),
        };
        let view = ProductView::from(&product);
        assert_eq!(view.id, 3);
        assert_eq!(view.price, "$55.99");
        assert_eq!(view.review_count, 500);
    }

    #[test]
    fn test_filter_view_echoes_values() {
        let filter = ProductFilter {
            search: "bag".to_string(),
            max_price: Some(Decimal::new(50, 0)),
            ..ProductFilter::default()
        };
        let view = FilterView::from(&filter);
        assert_eq!(view.search, "bag");
        assert_eq!(view.min_price, "");
        assert_eq!(view.max_price, "50");
        assert!(view.active);

        assert!(!FilterView::from(&ProductFilter::default()).active);
    }
}
