//! HTTP client for the product catalog.
//!
//! Uses `reqwest` 0.13 for HTTP. The decoded product list is cached with
//! `moka` for the configured TTL.

use std::sync::Arc;

use cornerstore_core::{Product, ProductId};
use moka::future::Cache;
use tracing::{debug, instrument, warn};
use url::Url;

use super::CatalogError;
use crate::config::CatalogConfig;

/// The whole catalog lives under a single cache entry.
const PRODUCTS_KEY: &str = "products";

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the product catalog endpoint.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
}

/// Result of a fail-soft catalog load.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub products: Arc<Vec<Product>>,
    /// `false` when the source could not be reached and `products` is empty.
    pub available: bool,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// Requests give up after `config.timeout`, so a stalled catalog fails
    /// like an unreachable one.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint: config.url.clone(),
                cache,
            }),
        }
    }

    /// Catalog endpoint this client reads from.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Fetch every product, served from cache while fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not a success or
    /// the body is not a product list.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch_products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        if let Some(products) = self.inner.cache.get(PRODUCTS_KEY).await {
            debug!("Cache hit for catalog");
            return Ok(products);
        }

        let products = Arc::new(self.request_products().await?);
        debug!(count = products.len(), "Catalog fetched");

        self.inner
            .cache
            .insert(PRODUCTS_KEY, Arc::clone(&products))
            .await;

        Ok(products)
    }

    /// Look a product up by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the id is not in the catalog, or
    /// any error from [`fetch_products`](Self::fetch_products).
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn find_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.fetch_products()
            .await?
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    /// Fetch the catalog, degrading to an empty list on failure.
    pub async fn load_catalog(&self) -> Catalog {
        match self.fetch_products().await {
            Ok(products) => Catalog {
                products,
                available: true,
            },
            Err(e) => {
                warn!(error = %e, "Catalog unavailable, showing empty listing");
                Catalog {
                    products: Arc::new(Vec::new()),
                    available: false,
                }
            }
        }
    }

    /// Drop the cached catalog so the next read hits the source.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(PRODUCTS_KEY).await;
    }

    async fn request_products(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::{Router, http::StatusCode, routing::get};

    use super::*;

    const PRODUCTS_JSON: &str = r#"[
        {"id": 1, "title": "Backpack", "price": 109.95, "description": "Fits a laptop",
         "category": "men's clothing", "image": "https://img.example/1.jpg",
         "rating": {"rate": 3.9, "count": 120}},
        {"id": 2, "title": "Ring", "price": 9.99, "description": "Silver",
         "category": "jewelery", "image": "https://img.example/2.jpg",
         "rating": {"rate": 4.5, "count": 3}}
    ]"#;

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/products")).unwrap()
    }

    fn client_for(url: Url) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            url,
            cache_ttl: Duration::from_secs(60),
            timeout: Duration::from_millis(200),
        })
    }

    #[tokio::test]
    async fn test_fetch_products_decodes_and_caches() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new().route(
            "/products",
            get(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { PRODUCTS_JSON }
            }),
        );
        let client = client_for(serve(router).await);

        let first = client.fetch_products().await.unwrap();
        let second = client.fetch_products().await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        client.invalidate().await;
        client.fetch_products().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_find_product() {
        let router = Router::new().route("/products", get(|| async { PRODUCTS_JSON }));
        let client = client_for(serve(router).await);

        let ring = client.find_product(ProductId::new(2)).await.unwrap();
        assert_eq!(ring.title, "Ring");

        let err = client.find_product(ProductId::new(99)).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(id) if id == ProductId::new(99)));
    }

    #[tokio::test]
    async fn test_error_status_and_fail_soft_load() {
        let router = Router::new().route(
            "/products",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let client = client_for(serve(router).await);

        let err = client.fetch_products().await.unwrap_err();
        assert!(matches!(err, CatalogError::Status { status: 503 }));

        let catalog = client.load_catalog().await;
        assert!(!catalog.available);
        assert!(catalog.products.is_empty());
    }

    #[tokio::test]
    async fn test_stalled_catalog_times_out_to_empty_listing() {
        let router = Router::new().route(
            "/products",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                PRODUCTS_JSON
            }),
        );
        let client = client_for(serve(router).await);

        let started = std::time::Instant::now();
        let err = client.fetch_products().await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(ref e) if e.is_timeout()));

        let catalog = client.load_catalog().await;
        assert!(!catalog.available);
        assert!(catalog.products.is_empty());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let router = Router::new().route("/products", get(|| async { "{\"not\": \"a list\"}" }));
        let client = client_for(serve(router).await);

        let err = client.fetch_products().await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
