//! Cart durability across page loads, backed by the file store.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use minums_integration_tests::TestContext;
use minums_storefront::cart::CartCandidate;
use minums_storefront::catalog::CatalogClient;
use minums_storefront::config::StorefrontConfig;
use minums_storefront::pages::{ConfirmationParams, OrderToken, render_confirmation_page};
use minums_storefront::product::{ProductContext, ProductParams};
use minums_storefront::storage::FileStore;

#[test]
fn test_cart_survives_page_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("minums-store.json");

    let first = TestContext::over(FileStore::open(&path).unwrap());
    first
        .carts
        .add(CartCandidate::from_listing(
            "Tropical Sunset Smoothie",
            Decimal::new(1200, 2),
            None,
        ))
        .unwrap();
    first
        .carts
        .add(CartCandidate::from_listing(
            "Tropical Sunset Smoothie",
            Decimal::new(1200, 2),
            None,
        ))
        .unwrap();
    drop(first);

    // A fresh page load reads the same file and sees the merged line.
    let second = TestContext::over(FileStore::open(&path).unwrap());
    let cart = second.carts.load();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].quantity, 2);
    assert_eq!(second.carts.count(), 2);
}

#[test]
fn test_placed_order_clears_the_persisted_cart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("minums-store.json");

    let session = TestContext::over(FileStore::open(&path).unwrap());
    session
        .carts
        .add(CartCandidate::from_listing(
            "Signature Cold Brew",
            Decimal::new(900, 2),
            None,
        ))
        .unwrap();

    let token = OrderToken::generate();
    render_confirmation_page(
        &session.carts,
        &session.session,
        &ConfirmationParams::default(),
        &token,
    )
    .unwrap();
    drop(session);

    let reloaded = TestContext::over(FileStore::open(&path).unwrap());
    assert!(reloaded.carts.load().is_empty());
}

#[tokio::test]
async fn test_unreachable_catalog_keeps_detail_page_defaults() {
    let config = StorefrontConfig {
        catalog_base_url: "http://127.0.0.1:1".to_string(),
        store_path: "minums-store.json".into(),
        catalog_cache_ttl_secs: 300,
    };
    let catalog = CatalogClient::new(&config);

    let params = ProductParams::from_query("id=signature-cold-brew&name=Cold+Brew&price=9.00")
        .unwrap();
    let ctx = ProductContext::from_params(params).hydrate(&catalog).await;

    // The failed lookup is non-fatal: sizes stay on, add-ons stay off.
    assert!(ctx.allow_sizes);
    assert!(!ctx.allow_addons);
    assert!(ctx.addons.is_empty());
}
