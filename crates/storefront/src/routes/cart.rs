//! Cart route handlers.
//!
//! Mutations follow post/redirect/get and answer `303 See Other`; with
//! `hx-boost` the browser swaps the page in place. The cart itself lives in
//! the session under the fixed cart key.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use cornerstore_core::cart::CartRepository;
use cornerstore_core::{CartLedger, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::services::{load_cart, save_cart};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Snapshot a ledger for rendering.
    #[must_use]
    pub fn from_ledger<R: CartRepository>(ledger: &CartLedger<R>) -> Self {
        Self {
            items: ledger
                .entries()
                .iter()
                .map(|entry| CartItemView {
                    id: entry.id.as_i32(),
                    title: entry.product.title.clone(),
                    image: entry.product.image.clone(),
                    quantity: entry.quantity,
                    price: entry.product.price.to_string(),
                    line_price: entry.line_total().to_string(),
                })
                .collect(),
            subtotal: ledger.total().to_string(),
            item_count: ledger.item_count(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    /// Page to return to; defaults to the cart.
    pub return_to: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    /// Zero or negative removes the entry.
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u32,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    let view = CartView::from_ledger(&cart);

    CartShowTemplate {
        cart_count: view.item_count,
        cart: view,
    }
}

/// Add one unit of a catalog product.
///
/// # Errors
///
/// Returns 404 if the product is not in the catalog and 502 if the catalog
/// cannot be reached.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state.catalog().find_product(form.product_id).await?;

    let mut cart = load_cart(&session).await;
    cart.add_item(&product);
    let count = cart.item_count();
    save_cart(&session, cart).await;

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("product_id", form.product_id.to_string().as_str())]),
    );
    tracing::info!(product_id = %form.product_id, count, "Item added to cart");

    let target = safe_return_to(form.return_to.as_deref()).unwrap_or("/cart");
    Ok(Redirect::to(target).into_response())
}

/// Set the quantity of an entry.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let mut cart = load_cart(&session).await;
    cart.update_quantity(form.product_id, form.quantity);
    save_cart(&session, cart).await;

    add_breadcrumb(
        "cart",
        "Updated quantity",
        Some(&[
            ("product_id", form.product_id.to_string().as_str()),
            ("quantity", form.quantity.to_string().as_str()),
        ]),
    );

    Redirect::to("/cart").into_response()
}

/// Remove an entry.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    let mut cart = load_cart(&session).await;
    cart.remove_item(form.product_id);
    save_cart(&session, cart).await;

    add_breadcrumb(
        "cart",
        "Removed item",
        Some(&[("product_id", form.product_id.to_string().as_str())]),
    );

    Redirect::to("/cart").into_response()
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Response {
    let mut cart = load_cart(&session).await;
    cart.clear_cart();
    save_cart(&session, cart).await;

    add_breadcrumb("cart", "Cleared cart", None);

    Redirect::to("/cart").into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartCountTemplate {
        count: cart.item_count(),
    }
}

/// Accept only same-site absolute paths as redirect targets.
fn safe_return_to(target: Option<&str>) -> Option<&str> {
    target.filter(|t| t.starts_with('/') && !t.starts_with("//") && !t.contains('\\'))
}

#[cfg(test)]
mod tests {
    use cornerstore_core::cart::{KeyValueCartRepository, MemoryStore};
    use cornerstore_core::{Price, Product, Rating};

    use super::*;

    #[test]
    fn test_safe_return_to() {
        assert_eq!(safe_return_to(Some("/?category=jewelery")), Some("/?category=jewelery"));
        assert_eq!(safe_return_to(Some("/cart")), Some("/cart"));
        assert_eq!(safe_return_to(Some("//evil.example")), None);
        assert_eq!(safe_return_to(Some("https://evil.example")), None);
        assert_eq!(safe_return_to(Some("/\\evil.example")), None);
        assert_eq!(safe_return_to(None), None);
    }

    #[test]
    fn test_cart_view_from_ledger() {
        let mut ledger = CartLedger::load(KeyValueCartRepository::new(MemoryStore::new()));
        let product = Product {
            id: ProductId::new(5),
            title: "Ring".to_string(),
            description: String::new(),
            price: Price::from_cents(999),
            rating: Rating {
                rate: 4.0,
                count: 1,
            },
            image: "https://img.example/5.jpg".to_string(),
            category: "jewelery".to_string(),
        };
        ledger.add_item(&product);
        ledger.add_item(&product);

        let view = CartView::from_ledger(&ledger);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.subtotal, "$19.98");
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items.first().map(|i| i.line_price.as_str()), Some("$19.98"));
    }
}
