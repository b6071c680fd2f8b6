//! End-to-end shopping flow: configure a drink, fill the cart, render every
//! page, and place the order.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use minums_integration_tests::TestContext;
use minums_storefront::cart::CartCandidate;
use minums_storefront::catalog::{AddOn, ProductMetadata};
use minums_storefront::pages::{
    ConfirmationPageView, ConfirmationParams, OrderToken, render_cart_page, render_checkout_page,
    render_confirmation_page,
};
use minums_storefront::product::{self, ProductContext, ProductParams, Selections};
use minums_storefront::storage::KeyValueStore;
use minums_storefront::ui::NoticeKind;

fn configured_brew() -> (ProductContext, Selections) {
    let params = ProductParams::from_query(
        "id=signature-cold-brew&name=Signature+Cold+Brew&price=9.00&image=images%2Fcold-brew.jpg",
    )
    .unwrap();
    let ctx = ProductContext::from_params(params).merge_metadata(ProductMetadata {
        addons: vec![
            AddOn {
                name: "Oat Milk".to_string(),
                price: Decimal::new(100, 2),
            },
            AddOn {
                name: "Espresso Shot".to_string(),
                price: Decimal::new(250, 2),
            },
        ],
        addons_limit: 2,
        allow_addons: true,
        allow_sizes: true,
    });

    let mut selections = Selections::default();
    selections.select_size("large", Decimal::new(200, 2));
    selections
        .check_addon(ctx.addons[0].clone(), ctx.addons_limit)
        .unwrap();
    selections.note = "less ice please".to_string();
    (ctx, selections)
}

#[test]
fn test_full_journey_from_detail_page_to_confirmation() {
    let t = TestContext::new();
    let (ctx, selections) = configured_brew();

    // Live price on the detail page: 9.00 + 2.00 size + 1.00 add-on.
    assert_eq!(
        product::compute_price(&ctx, &selections),
        Decimal::new(1200, 2)
    );

    // Adding the same configuration twice merges into one line.
    t.carts.add(product::submit(&ctx, &selections)).unwrap();
    t.carts.add(product::submit(&ctx, &selections)).unwrap();
    let cart = t.carts.load();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].quantity, 2);
    assert_eq!(cart[0].price, Decimal::new(1200, 2));
    assert_eq!(t.ui.badge_count(), 2);
    assert_eq!(
        t.ui.current().unwrap().message,
        "Signature Cold Brew added to cart!"
    );

    // A plain listing-card add lands as its own line.
    t.carts
        .add(CartCandidate::from_listing(
            "Calming Chamomile Tea",
            Decimal::new(700, 2),
            Some("images/chamomile.jpg"),
        ))
        .unwrap();

    // Cart page: rows and totals. 24.00 + 7.00 = 31.00 subtotal.
    let cart_page = render_cart_page(&t.carts);
    assert_eq!(cart_page.rows.len(), 2);
    assert_eq!(cart_page.rows[0].row_subtotal, "RM24.00");
    let summary = cart_page.summary.unwrap();
    assert_eq!(summary.subtotal, "RM31.00");
    assert_eq!(summary.tax, "RM2.17");
    assert_eq!(summary.total, "RM36.17");

    // Bump the tea from the cart page and recheck at checkout.
    let tea_id = cart_page.rows[1].id.clone();
    t.carts.set_quantity(&tea_id, 3).unwrap();
    assert_eq!(t.ui.badge_count(), 5);

    let checkout = render_checkout_page(&t.carts);
    assert_eq!(checkout.lines[0], "2x Signature Cold Brew");
    assert_eq!(checkout.lines[1], "3x Calming Chamomile Tea");
    assert_eq!(checkout.summary.subtotal, "RM45.00");
    assert_eq!(checkout.summary.total, "RM51.15");

    // Place the order.
    let token = OrderToken::generate();
    let params = ConfirmationParams::from_query("address=12+Jalan+Bukit%2C+Kuala+Lumpur");
    let view = render_confirmation_page(&t.carts, &t.session, &params, &token).unwrap();

    let ConfirmationPageView::Order(order) = view else {
        panic!("expected an order view");
    };
    assert_eq!(order.order_token, token.as_str());
    assert_eq!(order.address, "12 Jalan Bukit, Kuala Lumpur");
    assert_eq!(order.lines.len(), 2);
    assert_eq!(order.summary.total, "RM51.15");

    // The guarded clear ran exactly once.
    assert!(t.carts.load().is_empty());
    assert_eq!(t.ui.badge_count(), 0);
    assert_eq!(
        t.session.get(&token.guard_key()).unwrap().as_deref(),
        Some("true")
    );

    // Reloading the confirmation shows the processed state, not a new order.
    let reloaded = render_confirmation_page(&t.carts, &t.session, &params, &token).unwrap();
    assert_eq!(reloaded, ConfirmationPageView::AlreadyProcessed);
}

#[test]
fn test_different_customizations_are_separate_cart_lines() {
    let t = TestContext::new();
    let (ctx, large) = configured_brew();

    let mut with_shot = large.clone();
    with_shot
        .check_addon(ctx.addons[1].clone(), ctx.addons_limit)
        .unwrap();

    t.carts.add(product::submit(&ctx, &large)).unwrap();
    t.carts.add(product::submit(&ctx, &with_shot)).unwrap();

    let cart = t.carts.load();
    assert_eq!(cart.len(), 2);
    assert_eq!(cart[0].price, Decimal::new(1200, 2));
    assert_eq!(cart[1].price, Decimal::new(1450, 2));
}

#[test]
fn test_rejected_quantity_update_warns_without_touching_cart() {
    let t = TestContext::new();
    let (ctx, selections) = configured_brew();
    t.carts.add(product::submit(&ctx, &selections)).unwrap();

    let id = t.carts.load()[0].id.clone();
    assert!(t.carts.set_quantity(&id, 0).is_err());

    assert_eq!(t.carts.load()[0].quantity, 1);
    assert_eq!(t.ui.current().unwrap().kind, NoticeKind::Warning);
    assert_eq!(t.ui.current().unwrap().message, "Quantity must be at least 1");
}
