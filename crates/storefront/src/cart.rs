//! Cart management.
//!
//! The persisted cart is the sole source of truth across pages: every
//! operation loads the stored line items, mutates, and writes back. A line
//! item's identity string decides merging - adding an identity already in
//! the cart bumps that line's quantity in place instead of appending a row.
//!
//! Totals are derived, never stored: `OrderSummary::for_cart` applies the
//! flat delivery fee and percentage tax to a cart snapshot, and every page
//! renders from the same derivation.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use minums_core::LineItemId;

use crate::catalog::AddOn;
use crate::storage::{CART_KEY, KeyValueStore, StorageError};
use crate::ui::StorefrontUi;

/// Flat delivery fee applied to every order.
#[must_use]
pub fn delivery_fee() -> Decimal {
    Decimal::new(300, 2) // 3.00
}

/// Tax rate applied to the subtotal.
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(7, 2) // 0.07
}

/// Image reference used when a candidate carries none.
pub const PLACEHOLDER_IMAGE: &str = "images/default.jpg";

/// One priced, quantified entry in the cart.
///
/// `price` is the per-unit price under the line's chosen options, fixed at
/// add-time; it is never recomputed from catalog data afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
    /// Informational record of the options behind the identity; not
    /// re-validated against it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<LineOptions>,
}

/// The customization captured at submit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineOptions {
    pub size: String,
    #[serde(default)]
    pub selected_addons: Vec<AddOn>,
    #[serde(default)]
    pub enquiry: String,
}

/// A line item candidate handed to [`CartStore::add`].
///
/// A candidate without an explicit identity falls back to name-based merging
/// and gets a generated identity if it lands as a new row.
#[derive(Debug, Clone)]
pub struct CartCandidate {
    pub id: Option<LineItemId>,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub quantity: u32,
    pub options: Option<LineOptions>,
}

impl CartCandidate {
    /// Candidate built from a listing-page product card, which exposes only
    /// name, price, and image. The identity is the hyphenated lowercase name
    /// so repeated adds of the same card merge.
    #[must_use]
    pub fn from_listing(name: &str, price: Decimal, image: Option<&str>) -> Self {
        let slug = name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        Self {
            id: Some(LineItemId::new(slug)),
            name: name.to_string(),
            price,
            image: image.map(ToString::to_string),
            quantity: 1,
            options: None,
        }
    }
}

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity updates below 1 are rejected and leave the cart unchanged.
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(i64),

    /// The persistence layer failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Sum of quantities across all lines.
#[must_use]
pub fn total_quantity(cart: &[LineItem]) -> u32 {
    cart.iter().map(|item| item.quantity).sum()
}

// =============================================================================
// CartStore
// =============================================================================

/// Owns cart reads and mutations against a key-value store.
pub struct CartStore<S> {
    store: S,
    ui: Arc<dyn StorefrontUi>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a cart store over `store`, pushing chrome updates through `ui`.
    pub fn new(store: S, ui: Arc<dyn StorefrontUi>) -> Self {
        Self { store, ui }
    }

    /// Read the persisted cart.
    ///
    /// An absent, unreadable, or unparseable value is treated as an empty
    /// cart; corruption is logged but never surfaced.
    #[must_use]
    pub fn load(&self) -> Vec<LineItem> {
        let raw = match self.store.get(CART_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "cart storage unreadable, treating as empty");
                return Vec::new();
            }
        };
        let Some(raw) = raw else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(cart) => cart,
            Err(e) => {
                warn!(error = %e, "persisted cart unparseable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Persist the full cart and refresh the header badge.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub fn save(&self, cart: &[LineItem]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cart)?;
        self.store.set(CART_KEY, &raw)?;
        self.ui.refresh_cart_badge(total_quantity(cart));
        Ok(())
    }

    /// Add a candidate to the cart.
    ///
    /// Merge rule: an existing line with the candidate's explicit identity
    /// absorbs the quantity; when the candidate carries no identity, a line
    /// with the same display name does. Otherwise the candidate is appended
    /// as a new line (quantity at least 1, image defaulted to the
    /// placeholder, identity generated when absent).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting the updated cart fails.
    pub fn add(&self, candidate: CartCandidate) -> Result<(), StorageError> {
        let mut cart = self.load();
        let added = candidate.quantity.max(1);

        let existing = cart.iter_mut().find(|item| match &candidate.id {
            Some(id) => item.id == *id,
            None => item.name == candidate.name,
        });

        let name = candidate.name.clone();
        if let Some(item) = existing {
            item.quantity += added;
        } else {
            cart.push(LineItem {
                id: candidate.id.unwrap_or_else(generated_identity),
                name: candidate.name,
                price: candidate.price,
                image: candidate
                    .image
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
                quantity: added,
                options: candidate.options,
            });
        }

        self.save(&cart)?;
        self.ui.notify_added(&format!("{name} added to cart!"));
        Ok(())
    }

    /// Remove the line with `id`. Unknown ids leave the cart unchanged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting the updated cart fails.
    pub fn remove(&self, id: &LineItemId) -> Result<(), StorageError> {
        let mut cart = self.load();
        cart.retain(|item| item.id != *id);
        self.save(&cart)
    }

    /// Set the quantity of the line with `id`.
    ///
    /// Quantities below 1 are rejected with a user-visible warning and no
    /// state change. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for quantities below 1, or a
    /// wrapped `StorageError` if persisting fails.
    pub fn set_quantity(&self, id: &LineItemId, quantity: i64) -> Result<(), CartError> {
        if quantity < 1 {
            self.ui.warn("Quantity must be at least 1");
            return Err(CartError::InvalidQuantity(quantity));
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let mut cart = self.load();
        if let Some(item) = cart.iter_mut().find(|item| item.id == *id) {
            item.quantity = quantity;
            self.save(&cart)?;
        }
        Ok(())
    }

    /// Total item quantity in the persisted cart; 0 when empty.
    #[must_use]
    pub fn count(&self) -> u32 {
        total_quantity(&self.load())
    }

    /// Drop the persisted cart entirely and zero the badge.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the removal fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(CART_KEY)?;
        self.ui.refresh_cart_badge(0);
        Ok(())
    }
}

/// Time-based identity for candidates that arrive without one.
fn generated_identity() -> LineItemId {
    LineItemId::new(format!("item-{}", chrono::Utc::now().timestamp_millis()))
}

// =============================================================================
// OrderSummary
// =============================================================================

/// Derived totals for a cart snapshot. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub item_count: u32,
}

impl OrderSummary {
    /// Derive the summary: subtotal = Σ price·quantity, tax = subtotal·7%,
    /// total = subtotal + delivery + tax.
    #[must_use]
    pub fn for_cart(cart: &[LineItem]) -> Self {
        let subtotal: Decimal = cart
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();
        let fee = delivery_fee();
        let tax = subtotal * tax_rate();
        let total = subtotal + fee + tax;

        Self {
            subtotal,
            delivery_fee: fee,
            tax,
            total,
            item_count: total_quantity(cart),
        }
    }
}
