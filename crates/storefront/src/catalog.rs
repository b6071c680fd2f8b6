//! Remote product metadata lookup.
//!
//! Product documents live in a remote document store keyed by product id.
//! The lookup is read-only and strictly best-effort: a missing document,
//! network failure, or malformed payload leaves the detail page on its
//! synchronous defaults (sizes shown, no add-ons). No retries are performed.
//!
//! Successful lookups are cached with `moka` (5-minute TTL) so repeated
//! detail-page visits do not refetch.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use minums_core::ProductId;

use crate::config::StorefrontConfig;

/// A selectable add-on (flavor, topping) with its incremental price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    pub name: String,
    pub price: Decimal,
}

/// Extended product capabilities fetched from the document store.
///
/// Every field is optional in the remote document; the defaults match the
/// detail page's synchronous behavior before the fetch resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductMetadata {
    /// Add-ons offered for this product.
    pub addons: Vec<AddOn>,
    /// Maximum number of add-ons selectable at once; `0` means unlimited.
    pub addons_limit: u32,
    /// Whether the add-on list is shown at all.
    pub allow_addons: bool,
    /// Whether the size selector is shown. Defaults to true.
    pub allow_sizes: bool,
}

impl Default for ProductMetadata {
    fn default() -> Self {
        Self {
            addons: Vec::new(),
            addons_limit: 0,
            allow_addons: false,
            allow_sizes: true,
        }
    }
}

/// Errors from the catalog document store.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Read-only client for the remote product document store.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, ProductMetadata>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(config.catalog_cache_ttl_secs))
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.catalog_base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// Fetch the metadata document for a product.
    ///
    /// Returns `Ok(None)` when the store has no document for the id; callers
    /// keep their defaults in that case as well as on `Err`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on transport or parse failure.
    #[instrument(skip(self))]
    pub async fn get_product_metadata(
        &self,
        id: &ProductId,
    ) -> Result<Option<ProductMetadata>, CatalogError> {
        let key = id.as_str().to_string();
        if let Some(metadata) = self.inner.cache.get(&key).await {
            return Ok(Some(metadata));
        }

        let url = format!("{}/products/{id}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(product = %id, "no catalog document for product");
            return Ok(None);
        }
        let response = response.error_for_status()?;

        let text = response.text().await?;
        let metadata: ProductMetadata = serde_json::from_str(&text)?;

        self.inner.cache.insert(key, metadata.clone()).await;
        Ok(Some(metadata))
    }
}
