//! Page chrome seam: cart badge, transient notifications, inline warnings.
//!
//! The actual header badge and toast elements live in the DOM, which is an
//! external collaborator. [`StorefrontUi`] is the narrow interface the cart
//! and configurator push through; every method defaults to a no-op so a page
//! without the element (e.g., no badge in the header) simply ignores the
//! call. [`NotificationCenter`] is the concrete chrome model used by the
//! pages and by tests: a single notice slot with replace-on-show and a fixed
//! auto-dismiss delay.

use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// How long a transient notice stays visible before auto-dismissing.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Interface to the page chrome. All methods are optional.
pub trait StorefrontUi: Send + Sync {
    /// Update the header cart badge with the total item quantity.
    fn refresh_cart_badge(&self, _count: u32) {}

    /// Surface a transient "item added" notification.
    fn notify_added(&self, _message: &str) {}

    /// Surface an inline warning for a rejected operation.
    fn warn(&self, _message: &str) {}
}

/// Chrome that ignores every update (page has no badge or toast area).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUi;

impl StorefrontUi for NoopUi {}

// =============================================================================
// NotificationCenter
// =============================================================================

/// Kind of notice currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Added,
    Warning,
}

/// A visible notice.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    shown_at: Instant,
}

/// Single-slot notification state with timed auto-dismiss.
///
/// At most one notice is visible at a time; showing a new one replaces the
/// current one, and an expired notice disappears lazily on the next read.
/// Also tracks the badge count so tests can observe the header state.
#[derive(Debug)]
pub struct NotificationCenter {
    active: Mutex<Option<Notice>>,
    ttl: Duration,
    badge: AtomicU32,
}

impl NotificationCenter {
    /// Create a center with the standard 3-second dismiss delay.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(NOTICE_TTL)
    }

    /// Create a center with a custom dismiss delay (tests use `Duration::ZERO`).
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            active: Mutex::new(None),
            ttl,
            badge: AtomicU32::new(0),
        }
    }

    fn show(&self, kind: NoticeKind, message: &str) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        // Replace whatever is currently visible.
        *active = Some(Notice {
            kind,
            message: message.to_string(),
            shown_at: Instant::now(),
        });
    }

    /// The currently visible notice, if its dismiss delay has not elapsed.
    #[must_use]
    pub fn current(&self) -> Option<Notice> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(notice) = active.as_ref()
            && notice.shown_at.elapsed() >= self.ttl
        {
            *active = None;
        }
        active.clone()
    }

    /// Dismiss the visible notice immediately.
    pub fn dismiss(&self) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        *active = None;
    }

    /// Last badge count pushed by the cart store.
    #[must_use]
    pub fn badge_count(&self) -> u32 {
        self.badge.load(Ordering::Relaxed)
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl StorefrontUi for NotificationCenter {
    fn refresh_cart_badge(&self, count: u32) {
        self.badge.store(count, Ordering::Relaxed);
    }

    fn notify_added(&self, message: &str) {
        self.show(NoticeKind::Added, message);
    }

    fn warn(&self, message: &str) {
        self.show(NoticeKind::Warning, message);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notice_replaces_current() {
        let center = NotificationCenter::new();
        center.notify_added("Latte added to cart!");
        center.notify_added("Mocha added to cart!");

        let notice = center.current().unwrap();
        assert_eq!(notice.message, "Mocha added to cart!");
        assert_eq!(notice.kind, NoticeKind::Added);
    }

    #[test]
    fn test_expired_notice_is_dismissed() {
        let center = NotificationCenter::with_ttl(Duration::ZERO);
        center.notify_added("Latte added to cart!");
        assert!(center.current().is_none());
    }

    #[test]
    fn test_warning_uses_same_slot() {
        let center = NotificationCenter::new();
        center.notify_added("Latte added to cart!");
        center.warn("Quantity must be at least 1");

        let notice = center.current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Warning);
    }

    #[test]
    fn test_dismiss_clears_notice() {
        let center = NotificationCenter::new();
        center.warn("Quantity must be at least 1");
        center.dismiss();
        assert!(center.current().is_none());
    }

    #[test]
    fn test_badge_tracks_latest_count() {
        let center = NotificationCenter::new();
        assert_eq!(center.badge_count(), 0);
        center.refresh_cart_badge(4);
        assert_eq!(center.badge_count(), 4);
    }
}
