//! Product detail configurator.
//!
//! Turns page-navigation parameters, remote catalog metadata, and the user's
//! size/add-on selections into a priced [`CartCandidate`]. There is no
//! ambient page-global product state: a [`ProductContext`] is built once
//! from the parameters and threaded through every operation, and the async
//! metadata fetch merges into it through a pure function that only reveals
//! capabilities - selections made before the fetch resolves are never
//! discarded.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use minums_core::{LineItemId, ProductId};

use crate::cart::{CartCandidate, LineOptions};
use crate::catalog::{AddOn, CatalogClient, ProductMetadata};

/// Description shown when neither the parameters nor the copy table have one.
pub const DEFAULT_DESCRIPTION: &str = "Delicious refreshment from The Minums.";

/// Errors from configurator operations.
#[derive(Debug, Error)]
pub enum ConfiguratorError {
    /// Checking another add-on would exceed the product's limit; the
    /// selection is left unchanged and the caller un-checks the box.
    #[error("You can only select up to {limit} options.")]
    AddonLimitExceeded { limit: u32 },
}

// =============================================================================
// Navigation parameters
// =============================================================================

/// Product parameters carried in the detail page's query string.
#[derive(Debug, Clone)]
pub struct ProductParams {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub desc: Option<String>,
}

impl ProductParams {
    /// Parse the navigation query string (`id=...&name=...&price=...`).
    ///
    /// Returns `None` when `id`, `name`, or `price` is absent or the price
    /// does not parse - the page then keeps its static default content.
    #[must_use]
    pub fn from_query(query: &str) -> Option<Self> {
        let mut id = None;
        let mut name = None;
        let mut price = None;
        let mut image = None;
        let mut desc = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "id" => id = Some(value.into_owned()),
                "name" => name = Some(value.into_owned()),
                "price" => price = Some(value.into_owned()),
                "image" => image = Some(value.into_owned()),
                "desc" => desc = Some(value.into_owned()),
                _ => {}
            }
        }

        let (Some(id), Some(name), Some(price)) = (id, name, price) else {
            debug!("missing product parameters, keeping static page content");
            return None;
        };
        let Ok(price) = price.parse::<Decimal>() else {
            debug!(price = %price, "unparseable product price parameter");
            return None;
        };

        Some(Self {
            id: ProductId::new(id),
            name,
            price,
            image,
            desc,
        })
    }
}

// =============================================================================
// Product copy table
// =============================================================================

/// Editorial copy for a known product.
#[derive(Debug, Clone, Copy)]
pub struct ProductCopy {
    pub description: &'static str,
    pub details: &'static [&'static str],
    pub tag_line: &'static str,
}

/// Local fallback copy for the signature drinks, used when the navigation
/// parameters carry no description.
#[must_use]
pub fn copy_for(id: &ProductId) -> Option<&'static ProductCopy> {
    match id.as_str() {
        "signature-cold-brew" => Some(&SIGNATURE_COLD_BREW),
        "tropical-sunset-smoothie" => Some(&TROPICAL_SUNSET_SMOOTHIE),
        "calming-chamomile-tea" => Some(&CALMING_CHAMOMILE_TEA),
        _ => None,
    }
}

static SIGNATURE_COLD_BREW: ProductCopy = ProductCopy {
    description: "Our Signature Cold Brew is steeped for over 18 hours, resulting in a \
        super-smooth, low-acidity coffee concentrate. It's strong enough to kickstart your \
        morning and perfectly balanced to enjoy all day. Sourced from single-origin, \
        ethically farmed beans.",
    details: &[
        "Origin: Ethiopian Yirgacheffe",
        "Notes: Chocolate, Caramel, hint of Citrus",
        "Caffeine Level: High",
        "Best Served: Iced or over milk",
    ],
    tag_line: "Crafted for Clarity",
};

static TROPICAL_SUNSET_SMOOTHIE: ProductCopy = ProductCopy {
    description: "A vibrant blend of exotic tropical fruits including mango, pineapple, and \
        passion fruit. Each sip transports you to a sunny beach paradise. Packed with \
        vitamins and natural sweetness, it's the perfect refreshing treat for any time of day.",
    details: &[
        "Ingredients: Mango, Pineapple, Passion Fruit, Banana",
        "Vitamins: Rich in Vitamin C & A",
        "Sweetness: Naturally Sweet",
        "Best Served: Chilled with ice",
    ],
    tag_line: "Sunshine in a Glass",
};

static CALMING_CHAMOMILE_TEA: ProductCopy = ProductCopy {
    description: "Our Calming Chamomile Tea is made from premium dried chamomile flowers, \
        known for their soothing and relaxing properties. Perfect for unwinding after a long \
        day or enjoying a peaceful moment. Naturally caffeine-free and gently sweet.",
    details: &[
        "Type: Herbal Tea",
        "Origin: Organic Chamomile Flowers",
        "Caffeine: None",
        "Best Served: Hot or Iced",
    ],
    tag_line: "Peaceful Moments Await",
};

// =============================================================================
// ProductContext
// =============================================================================

/// Everything the detail page knows about the product being configured.
///
/// Built once at page initialization; the metadata fetch merges into it via
/// [`ProductContext::merge_metadata`].
#[derive(Debug, Clone)]
pub struct ProductContext {
    pub id: ProductId,
    pub name: String,
    pub base_price: Decimal,
    pub image: Option<String>,
    pub description: String,
    pub tag_line: Option<String>,
    pub details: Vec<String>,
    /// Size selector shown. True until metadata says otherwise.
    pub allow_sizes: bool,
    /// Add-on list shown. False until metadata enables it.
    pub allow_addons: bool,
    pub addons: Vec<AddOn>,
    /// Maximum add-ons selectable; `0` means unlimited.
    pub addons_limit: u32,
}

impl ProductContext {
    /// Build the page context from navigation parameters, falling back to
    /// the local copy table and finally a generic placeholder for the
    /// descriptive fields.
    #[must_use]
    pub fn from_params(params: ProductParams) -> Self {
        let copy = copy_for(&params.id);
        let description = params
            .desc
            .or_else(|| copy.map(|c| c.description.to_string()))
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
        let tag_line = copy.map(|c| c.tag_line.to_string());
        let details = copy
            .map(|c| c.details.iter().map(ToString::to_string).collect())
            .unwrap_or_default();

        Self {
            id: params.id,
            name: params.name,
            base_price: params.price,
            image: params.image,
            description,
            tag_line,
            details,
            allow_sizes: true,
            allow_addons: false,
            addons: Vec::new(),
            addons_limit: 0,
        }
    }

    /// Fold fetched metadata into the context.
    ///
    /// Only capability fields change: identity, name, pricing, and copy are
    /// untouched, so selections made while the fetch was in flight stay
    /// valid.
    #[must_use]
    pub fn merge_metadata(mut self, metadata: ProductMetadata) -> Self {
        self.allow_sizes = metadata.allow_sizes;
        self.allow_addons = metadata.allow_addons;
        self.addons = metadata.addons;
        self.addons_limit = metadata.addons_limit;
        self
    }

    /// Fetch and merge catalog metadata. A missing document or failed
    /// lookup leaves the defaults in place; neither is fatal and no retry
    /// is attempted.
    pub async fn hydrate(self, catalog: &CatalogClient) -> Self {
        match catalog.get_product_metadata(&self.id).await {
            Ok(Some(metadata)) => self.merge_metadata(metadata),
            Ok(None) => self,
            Err(e) => {
                debug!(product = %self.id, error = %e, "catalog lookup failed, keeping defaults");
                self
            }
        }
    }

    /// Browser title for the detail page.
    #[must_use]
    pub fn page_title(&self) -> String {
        format!("{} | The Minum", self.name)
    }
}

// =============================================================================
// Selections
// =============================================================================

/// A chosen size and its incremental price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeChoice {
    pub label: String,
    pub surcharge: Decimal,
}

/// The user's current form state on the detail page.
#[derive(Debug, Clone)]
pub struct Selections {
    pub size: Option<SizeChoice>,
    pub addons: Vec<AddOn>,
    pub note: String,
    pub quantity: u32,
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            size: None,
            addons: Vec::new(),
            note: String::new(),
            quantity: 1,
        }
    }
}

impl Selections {
    /// Record a size selection.
    pub fn select_size(&mut self, label: impl Into<String>, surcharge: Decimal) {
        self.size = Some(SizeChoice {
            label: label.into(),
            surcharge,
        });
    }

    /// Check an add-on box. With a positive `limit`, a check that would
    /// exceed it is rejected and the selection left unchanged; the caller
    /// surfaces the error message and un-checks the box.
    ///
    /// # Errors
    ///
    /// Returns `ConfiguratorError::AddonLimitExceeded` when the limit is hit.
    pub fn check_addon(&mut self, addon: AddOn, limit: u32) -> Result<(), ConfiguratorError> {
        if limit > 0 && self.addons.len() >= limit as usize {
            return Err(ConfiguratorError::AddonLimitExceeded { limit });
        }
        if !self.addons.iter().any(|a| a.name == addon.name) {
            self.addons.push(addon);
        }
        Ok(())
    }

    /// Uncheck an add-on box.
    pub fn uncheck_addon(&mut self, name: &str) {
        self.addons.retain(|a| a.name != name);
    }
}

// =============================================================================
// Pricing and submission
// =============================================================================

/// Live per-unit price for the current selections: base price plus size
/// surcharge (zero when sizes are disabled or unselected) plus checked
/// add-ons.
#[must_use]
pub fn compute_price(ctx: &ProductContext, selections: &Selections) -> Decimal {
    let size = if ctx.allow_sizes {
        selections
            .size
            .as_ref()
            .map_or(Decimal::ZERO, |s| s.surcharge)
    } else {
        Decimal::ZERO
    };
    let addons: Decimal = selections.addons.iter().map(|a| a.price).sum();
    ctx.base_price + size + addons
}

/// Build the cart candidate for the current selections.
///
/// The identity appends a deterministic token of the chosen options to the
/// product id, so identical customizations merge in the cart while different
/// ones stay distinct lines.
#[must_use]
pub fn submit(ctx: &ProductContext, selections: &Selections) -> CartCandidate {
    let (size, surcharge) = if ctx.allow_sizes {
        selections.size.as_ref().map_or_else(
            || ("small".to_string(), Decimal::ZERO),
            |s| (s.label.clone(), s.surcharge),
        )
    } else {
        ("standard".to_string(), Decimal::ZERO)
    };

    let addons = selections.addons.clone();
    let addons_price: Decimal = addons.iter().map(|a| a.price).sum();
    let note = selections.note.clone();
    let quantity = selections.quantity.max(1);

    let unit_price = ctx.base_price + surcharge + addons_price;
    let token = options_token(&size, &addons, &note);
    let identity = LineItemId::new(format!("{}-{token}", ctx.id));

    CartCandidate {
        id: Some(identity),
        name: ctx.name.clone(),
        price: unit_price,
        image: ctx.image.clone(),
        quantity,
        options: Some(LineOptions {
            size,
            selected_addons: addons,
            enquiry: note,
        }),
    }
}

#[derive(Serialize)]
struct OptionsFingerprint<'a> {
    size: &'a str,
    addons: &'a [AddOn],
    enquiry: &'a str,
}

/// Deterministic encoding of the chosen options: the base64 of their
/// canonical JSON. Struct field order fixes the JSON, so equal options
/// always produce equal tokens and any difference in size, add-ons, or note
/// changes the token. The full encoding is kept; truncating it would leave
/// only the constant JSON prefix and merge differently-customized orders.
fn options_token(size: &str, addons: &[AddOn], enquiry: &str) -> String {
    let fingerprint = OptionsFingerprint {
        size,
        addons,
        enquiry,
    };
    let json = serde_json::to_string(&fingerprint).unwrap_or_default();
    STANDARD.encode(json)
}
