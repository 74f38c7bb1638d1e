//! Integration test harness for Corner Store.
//!
//! Every test gets its own stub catalog and its own storefront, both bound to
//! ephemeral ports, so tests run in parallel without shared state.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cornerstore-integration-tests
//! ```

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::{Router, http::StatusCode, routing::get};
use cornerstore_storefront::config::{CatalogConfig, PaymentConfig, StorefrontConfig};
use cornerstore_storefront::state::AppState;
use cornerstore_storefront::build_router;
use reqwest::redirect::Policy;
use tower_sessions::MemoryStore;
use url::Url;

/// Products served by the stub catalog, in the upstream wire format.
pub const PRODUCTS_JSON: &str = r#"[
    {"id": 1, "title": "Fjallraven Backpack", "price": 109.95,
     "description": "Your perfect pack for everyday use",
     "category": "men's clothing", "image": "https://img.example/1.jpg",
     "rating": {"rate": 3.9, "count": 120}},
    {"id": 2, "title": "Slim Fit T-Shirt", "price": 22.3,
     "description": "Slim-fitting style, contrast raglan long sleeve",
     "category": "men's clothing", "image": "https://img.example/2.jpg",
     "rating": {"rate": 4.1, "count": 259}},
    {"id": 5, "title": "Dragon Chain Bracelet", "price": 695,
     "description": "Gold and silver dragon station chain",
     "category": "jewelery", "image": "https://img.example/5.jpg",
     "rating": {"rate": 4.6, "count": 400}},
    {"id": 9, "title": "Portable External Hard Drive", "price": 64,
     "description": "USB 3.0 and USB 2.0 compatibility",
     "category": "electronics", "image": "https://img.example/9.jpg",
     "rating": {"rate": 3.3, "count": 203}}
]"#;

/// What the stub catalog answers with.
#[derive(Debug, Clone, Copy)]
pub enum CatalogStub {
    Products,
    Down,
}

/// Serve `router` on an ephemeral port and return its address.
pub async fn serve(router: Router) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Start a stub catalog and return its products URL.
pub async fn spawn_catalog(stub: CatalogStub) -> Url {
    let router = match stub {
        CatalogStub::Products => Router::new().route("/products", get(|| async { PRODUCTS_JSON })),
        CatalogStub::Down => Router::new().route(
            "/products",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "catalog exploded") }),
        ),
    };
    let addr = serve(router).await;
    Url::parse(&format!("http://{addr}/products")).unwrap()
}

/// Storefront configuration pointing at `catalog_url`, with instant settlement.
#[must_use]
pub fn test_config(catalog_url: Url) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost".to_string(),
        database_url: None,
        catalog: CatalogConfig {
            url: catalog_url,
            cache_ttl: Duration::from_secs(60),
            timeout: Duration::from_secs(2),
        },
        payment: PaymentConfig {
            settlement_delay: Duration::ZERO,
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Storefront router over in-memory sessions.
#[must_use]
pub fn test_app(config: StorefrontConfig) -> Router {
    build_router(AppState::new(config, None), MemoryStore::default())
}

/// A running storefront plus a browser-like client.
///
/// The client keeps cookies (so the session, and with it the cart, carries
/// across requests) and does not follow redirects, so tests can assert on
/// `303 See Other` and its `Location`.
pub struct TestContext {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestContext {
    /// Storefront backed by the product stub.
    pub async fn new() -> Self {
        Self::with_catalog(CatalogStub::Products).await
    }

    /// Storefront backed by the given catalog stub.
    pub async fn with_catalog(stub: CatalogStub) -> Self {
        let catalog_url = spawn_catalog(stub).await;
        Self::with_config(test_config(catalog_url)).await
    }

    /// Storefront backed by the product stub whose payments take `delay`.
    pub async fn with_settlement_delay(delay: Duration) -> Self {
        let mut config = test_config(spawn_catalog(CatalogStub::Products).await);
        config.payment.settlement_delay = delay;
        Self::with_config(config).await
    }

    /// Storefront with an explicit configuration.
    pub async fn with_config(config: StorefrontConfig) -> Self {
        let addr = serve(test_app(config)).await;
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .unwrap();

        Self {
            base_url: format!("http://{addr}"),
            client,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a page.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// GET a page and return its body, asserting a 200.
    pub async fn get_text(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK, "GET {path}");
        response.text().await.unwrap()
    }

    /// POST a urlencoded form.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// Add one unit of `product_id` to the cart.
    pub async fn add_to_cart(&self, product_id: &str) {
        let response = self.post("/cart/add", &[("product_id", product_id)]).await;
        assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
    }
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Complete shipping form.
pub const SHIPPING_FORM: [(&str, &str); 8] = [
    ("first_name", "Ada"),
    ("last_name", "Lovelace"),
    ("email", "ada@example.com"),
    ("address", "12 Analytical Row"),
    ("city", "London"),
    ("state", "Greater London"),
    ("zip_code", "NW1 6XE"),
    ("country", "United Kingdom"),
];

/// Complete payment form with an accepted card, typed without spaces.
pub const PAYMENT_FORM: [(&str, &str); 4] = [
    ("card_number", "4242424242424242"),
    ("card_holder", "Ada Lovelace"),
    ("expiry_date", "1230"),
    ("cvv", "123"),
];
