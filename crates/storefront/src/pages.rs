//! View models for the cart, checkout, and confirmation pages.
//!
//! Each render function takes a cart snapshot through [`CartStore`] and
//! produces a fully formatted view: every money figure is already a display
//! string, so the templates contain no arithmetic and all three pages agree
//! on the totals by construction.
//!
//! The confirmation page owns the one destructive flow: the cart is cleared
//! exactly once per order token, tracked by a session-scoped guard flag.

use rand::Rng as _;
use rust_decimal::Decimal;

use minums_core::{LineItemId, Price};

use crate::cart::{CartStore, LineItem, OrderSummary};
use crate::storage::{KeyValueStore, ORDER_PROCESSED_PREFIX, StorageError};

/// Copy shown on the cart page when there is nothing in the cart.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty";

/// Fallback shipping address when checkout passed none along.
pub const NO_ADDRESS_FALLBACK: &str = "No address provided";

/// Format an amount in the storefront currency.
fn rm(amount: Decimal) -> String {
    Price::myr(amount).display()
}

// =============================================================================
// Order summary view
// =============================================================================

/// Formatted totals block shared by all three pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub subtotal: String,
    pub delivery_fee: String,
    pub tax: String,
    pub total: String,
    pub item_count: u32,
}

impl SummaryView {
    fn from_summary(summary: &OrderSummary) -> Self {
        Self {
            subtotal: rm(summary.subtotal),
            delivery_fee: rm(summary.delivery_fee),
            tax: rm(summary.tax),
            total: rm(summary.total),
            item_count: summary.item_count,
        }
    }

    /// Label for the subtotal row, e.g. "Subtotal (3 items)".
    #[must_use]
    pub fn items_label(&self) -> String {
        let noun = if self.item_count == 1 { "item" } else { "items" };
        format!("Subtotal ({} {noun})", self.item_count)
    }
}

// =============================================================================
// Cart page
// =============================================================================

/// One editable row on the cart page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRowView {
    /// Identity the row's remove and quantity controls act on.
    pub id: LineItemId,
    pub name: String,
    pub image: String,
    pub unit_price: String,
    pub quantity: u32,
    pub row_subtotal: String,
}

/// The cart page: editable rows plus the totals block.
///
/// `summary` is `None` for an empty cart; the page shows
/// [`EMPTY_CART_MESSAGE`] and hides the totals block entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPageView {
    pub rows: Vec<CartRowView>,
    pub summary: Option<SummaryView>,
}

fn cart_row(item: &LineItem) -> CartRowView {
    CartRowView {
        id: item.id.clone(),
        name: item.name.clone(),
        image: item.image.clone(),
        unit_price: rm(item.price),
        quantity: item.quantity,
        row_subtotal: rm(item.price * Decimal::from(item.quantity)),
    }
}

/// Render the cart page from the persisted cart.
#[must_use]
pub fn render_cart_page<S: KeyValueStore>(carts: &CartStore<S>) -> CartPageView {
    let cart = carts.load();
    if cart.is_empty() {
        return CartPageView {
            rows: Vec::new(),
            summary: None,
        };
    }

    CartPageView {
        rows: cart.iter().map(cart_row).collect(),
        summary: Some(SummaryView::from_summary(&OrderSummary::for_cart(&cart))),
    }
}

// =============================================================================
// Checkout page
// =============================================================================

/// The checkout page's read-only order recap.
///
/// Unlike the cart page, the totals block is always shown; an empty cart
/// still carries the delivery fee into the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPageView {
    /// One line per cart entry, "2x Latte" style, or the empty-cart message.
    pub lines: Vec<String>,
    pub summary: SummaryView,
}

/// Render the checkout recap from the persisted cart.
#[must_use]
pub fn render_checkout_page<S: KeyValueStore>(carts: &CartStore<S>) -> CheckoutPageView {
    let cart = carts.load();
    let lines = if cart.is_empty() {
        vec![EMPTY_CART_MESSAGE.to_string()]
    } else {
        cart.iter()
            .map(|item| format!("{}x {}", item.quantity, item.name))
            .collect()
    };

    CheckoutPageView {
        lines,
        summary: SummaryView::from_summary(&OrderSummary::for_cart(&cart)),
    }
}

// =============================================================================
// Confirmation page
// =============================================================================

/// A display order number, "#TMR-" plus up to six random digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderToken(String);

impl OrderToken {
    /// Generate a fresh display token. Not guaranteed unique; the token
    /// only labels the confirmation page and scopes its clear-once guard.
    #[must_use]
    pub fn generate() -> Self {
        let n = rand::rng().random_range(0..1_000_000);
        Self(format!("#TMR-{n}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Session-store key of this token's processed flag.
    #[must_use]
    pub fn guard_key(&self) -> String {
        format!("{ORDER_PROCESSED_PREFIX}{}", self.0)
    }
}

impl std::fmt::Display for OrderToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameters the checkout form forwards to the confirmation page.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationParams {
    pub address: Option<String>,
}

impl ConfirmationParams {
    /// Parse the confirmation page's query string. Absent parameters fall
    /// back to placeholder copy at render time.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let address = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "address")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());
        Self { address }
    }
}

/// One recap line on the confirmation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineView {
    /// "Latte x2" style label.
    pub label: String,
    pub amount: String,
}

/// The rendered order confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    pub order_token: String,
    pub address: String,
    pub lines: Vec<OrderLineView>,
    pub summary: SummaryView,
}

/// Outcome of rendering the confirmation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationPageView {
    /// The order recap, rendered from the cart as it stood at arrival.
    Order(OrderView),
    /// The cart was already empty: a reload after the order was processed.
    AlreadyProcessed,
}

/// Render the confirmation page and run its clear-once side effect.
///
/// The recap is built from the cart before anything is cleared. If the
/// session store has no processed flag for `token`, the cart is cleared and
/// the flag set; reloads with the flag already present leave the (already
/// empty) cart alone. Arriving with an empty cart renders the
/// already-processed state instead of a zero-line order.
///
/// # Errors
///
/// Returns `StorageError` if clearing the cart or writing the guard flag
/// fails.
pub fn render_confirmation_page<S: KeyValueStore>(
    carts: &CartStore<S>,
    session: &dyn KeyValueStore,
    params: &ConfirmationParams,
    token: &OrderToken,
) -> Result<ConfirmationPageView, StorageError> {
    let cart = carts.load();
    if cart.is_empty() {
        return Ok(ConfirmationPageView::AlreadyProcessed);
    }

    let summary = OrderSummary::for_cart(&cart);
    let view = OrderView {
        order_token: token.as_str().to_string(),
        address: params
            .address
            .clone()
            .unwrap_or_else(|| NO_ADDRESS_FALLBACK.to_string()),
        lines: cart
            .iter()
            .map(|item| OrderLineView {
                label: format!("{} x{}", item.name, item.quantity),
                amount: rm(item.price * Decimal::from(item.quantity)),
            })
            .collect(),
        summary: SummaryView::from_summary(&summary),
    };

    let guard_key = token.guard_key();
    if session.get(&guard_key)?.is_none() {
        carts.clear()?;
        session.set(&guard_key, "true")?;
    }

    Ok(ConfirmationPageView::Order(view))
}
