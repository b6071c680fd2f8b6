//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MINUMS_CATALOG_URL` - Base URL of the product document store
//!
//! ## Optional
//! - `MINUMS_STORE_PATH` - Path of the local storage file (default: minums-store.json)
//! - `MINUMS_CATALOG_CACHE_TTL_SECS` - Catalog cache TTL in seconds (default: 300)

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the remote product document store
    pub catalog_base_url: String,
    /// Path of the client-local storage file
    pub store_path: PathBuf,
    /// Time-to-live for cached catalog documents, in seconds
    pub catalog_cache_ttl_secs: u64,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog_base_url = get_required_env("MINUMS_CATALOG_URL")?;
        let store_path =
            PathBuf::from(get_env_or_default("MINUMS_STORE_PATH", "minums-store.json"));
        let catalog_cache_ttl_secs = get_env_or_default("MINUMS_CATALOG_CACHE_TTL_SECS", "300")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MINUMS_CATALOG_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            catalog_base_url,
            store_path,
            catalog_cache_ttl_secs,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
