//! Integration tests for The Minums storefront.
//!
//! The tests in `tests/` drive whole page flows against real storage:
//! configure a drink, add it to the cart, render each page, and place the
//! order. [`TestContext`] wires a cart store, a session-scoped guard store,
//! and observable page chrome together the way a page load does.

use std::sync::Arc;
use std::sync::Once;

use minums_storefront::cart::CartStore;
use minums_storefront::storage::{KeyValueStore, MemoryStore};
use minums_storefront::ui::NotificationCenter;

static TRACING: Once = Once::new();

/// Install the tracing subscriber once for the whole test binary.
/// Controlled by `RUST_LOG`; storage-corruption warnings show up here.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// One simulated browsing session.
pub struct TestContext<S: KeyValueStore> {
    pub carts: CartStore<S>,
    pub session: MemoryStore,
    pub ui: Arc<NotificationCenter>,
}

impl<S: KeyValueStore> TestContext<S> {
    /// Build a session over the given persistent store.
    pub fn over(store: S) -> Self {
        init_tracing();
        let ui = Arc::new(NotificationCenter::new());
        Self {
            carts: CartStore::new(store, ui.clone()),
            session: MemoryStore::new(),
            ui,
        }
    }
}

impl TestContext<MemoryStore> {
    /// Build a session over fresh in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::over(MemoryStore::new())
    }
}

impl Default for TestContext<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}
