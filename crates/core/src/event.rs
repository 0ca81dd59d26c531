/// Events the host page delivers to the overlay controller.
///
/// Sources:
/// - Document scroll listener → `Scroll`
/// - Page teardown / navigation → `Unload`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The document scrolled; the new offset is already visible through
    /// [`crate::Document::scroll_metrics`].
    Scroll,
    /// The page is going away.  Listeners are released.
    Unload,
}

/// Handle for a registered scroll listener.
///
/// Ordered by registration so documents can keep listeners in a sorted set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);
