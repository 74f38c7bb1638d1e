//! Cart flow tests.
//!
//! The cart lives in the session, so every test drives a cookie-carrying
//! client through the real routes.

#![allow(clippy::unwrap_used)]

use cornerstore_integration_tests::{CatalogStub, TestContext, location};
use reqwest::StatusCode;

// ============================================================================
// Adding
// ============================================================================

#[tokio::test]
async fn test_new_session_has_empty_cart() {
    let ctx = TestContext::new().await;
    let body = ctx.get_text("/cart").await;

    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_add_redirects_to_cart_by_default() {
    let ctx = TestContext::new().await;
    let response = ctx.post("/cart/add", &[("product_id", "1")]).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");
}

#[tokio::test]
async fn test_add_returns_to_listing() {
    let ctx = TestContext::new().await;
    let response = ctx
        .post(
            "/cart/add",
            &[("product_id", "5"), ("return_to", "/?category=jewelery")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/?category=jewelery");
}

#[tokio::test]
async fn test_add_ignores_offsite_return_to() {
    let ctx = TestContext::new().await;
    let response = ctx
        .post(
            "/cart/add",
            &[("product_id", "5"), ("return_to", "//evil.example/")],
        )
        .await;

    assert_eq!(location(&response), "/cart");
}

#[tokio::test]
async fn test_adding_twice_increments_quantity() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("1").await;
    ctx.add_to_cart("1").await;
    ctx.add_to_cart("2").await;

    let body = ctx.get_text("/cart").await;
    assert!(body.contains("Items: 3"));
    assert!(body.contains("$219.90"));
    assert!(body.contains("Total: $242.20"));

    let badge = ctx.get_text("/cart/count").await;
    assert!(badge.contains(">3</span>"));
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let ctx = TestContext::new().await;
    let response = ctx.post("/cart/add", &[("product_id", "999")]).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(ctx.get_text("/cart").await.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_add_during_catalog_outage_is_bad_gateway() {
    let ctx = TestContext::with_catalog(CatalogStub::Down).await;
    let response = ctx.post("/cart/add", &[("product_id", "1")]).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// ============================================================================
// Updating and removing
// ============================================================================

#[tokio::test]
async fn test_update_sets_quantity() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("2").await;

    let response = ctx
        .post("/cart/update", &[("product_id", "2"), ("quantity", "4")])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");

    let body = ctx.get_text("/cart").await;
    assert!(body.contains("Items: 4"));
    assert!(body.contains("Total: $89.20"));
}

#[tokio::test]
async fn test_update_to_zero_or_below_removes() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("1").await;
    ctx.add_to_cart("2").await;

    ctx.post("/cart/update", &[("product_id", "1"), ("quantity", "0")])
        .await;
    let body = ctx.get_text("/cart").await;
    assert!(!body.contains("Fjallraven Backpack"));
    assert!(body.contains("Slim Fit T-Shirt"));

    ctx.post("/cart/update", &[("product_id", "2"), ("quantity", "-3")])
        .await;
    assert!(ctx.get_text("/cart").await.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_update_unknown_entry_is_a_no_op() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("1").await;

    let response = ctx
        .post("/cart/update", &[("product_id", "9"), ("quantity", "2")])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = ctx.get_text("/cart").await;
    assert!(body.contains("Items: 1"));
    assert!(!body.contains("Portable External Hard Drive"));
}

#[tokio::test]
async fn test_remove_and_clear() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("1").await;
    ctx.add_to_cart("5").await;
    ctx.add_to_cart("9").await;

    let response = ctx.post("/cart/remove", &[("product_id", "5")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let body = ctx.get_text("/cart").await;
    assert!(!body.contains("Dragon Chain Bracelet"));
    assert!(body.contains("Items: 2"));

    let response = ctx.post("/cart/clear", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(ctx.get_text("/cart").await.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("1").await;

    // Same server, fresh cookie jar
    let other = reqwest::Client::new();
    let body = other
        .get(ctx.url("/cart"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Your cart is empty."));
    assert!(ctx.get_text("/cart").await.contains("Items: 1"));
}
