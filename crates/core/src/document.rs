//! Capability interface over the host page.
//!
//! Every heuristic and the overlay itself talk to the page only through
//! [`Document`], so the whole pipeline runs unchanged against a real
//! rendering engine or the in-memory page in `readbar-dom`.

use crate::{event::SubscriptionId, Result};
use serde::{Deserialize, Serialize};

/// Opaque handle to an element owned by a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

// ── Selectors ─────────────────────────────────────────────────────────────────

/// One branch of a selector group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorPart {
    /// `tag`
    Tag(&'static str),
    /// `parent > child`
    Child {
        parent: &'static str,
        child:  &'static str,
    },
}

impl SelectorPart {
    /// Whether an element with `tag` whose parent has `parent_tag` matches.
    pub fn matches(&self, tag: &str, parent_tag: Option<&str>) -> bool {
        match self {
            Self::Tag(name) => tag.eq_ignore_ascii_case(name),
            Self::Child { parent, child } => {
                tag.eq_ignore_ascii_case(child)
                    && parent_tag.is_some_and(|p| p.eq_ignore_ascii_case(parent))
            }
        }
    }
}

/// A comma-separated selector group, e.g. `p, pre, article`.
///
/// Matching follows `querySelectorAll`: an element is returned once, in
/// document order, if any branch matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector(pub Vec<SelectorPart>);

impl Selector {
    /// Group of plain tag selectors.
    pub fn tags(tags: &[&'static str]) -> Self {
        Self(tags.iter().map(|&t| SelectorPart::Tag(t)).collect())
    }

    /// Add a `parent > child` branch.
    #[must_use]
    pub fn with_child(mut self, parent: &'static str, child: &'static str) -> Self {
        self.0.push(SelectorPart::Child { parent, child });
        self
    }

    pub fn matches(&self, tag: &str, parent_tag: Option<&str>) -> bool {
        self.0.iter().any(|part| part.matches(tag, parent_tag))
    }
}

// ── Style and geometry ────────────────────────────────────────────────────────

/// The subset of `getComputedStyle()` the overlay reads.
///
/// Values are CSS strings exactly as a browser serialises them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputedStyle {
    pub background_image: String,
    pub background_color: String,
    pub color:            String,
    pub position:         String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            background_image: "none".to_string(),
            background_color: "rgba(0, 0, 0, 0)".to_string(),
            color:            "rgb(0, 0, 0)".to_string(),
            position:         "static".to_string(),
        }
    }
}

/// Rendered element box (`offsetWidth` × `offsetHeight`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    pub width:  f64,
    pub height: f64,
}

/// Document-level scroll geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollMetrics {
    /// Legacy `document.body.scrollTop` (non-zero only in quirks mode).
    pub body_scroll_top:  f64,
    /// `document.documentElement.scrollTop`.
    pub scroll_top:       f64,
    /// `document.documentElement.scrollHeight`.
    pub scroll_height:    f64,
    /// `document.documentElement.clientHeight`.
    pub client_height:    f64,
    /// `document.documentElement.clientWidth`.
    pub client_width:     f64,
}

impl ScrollMetrics {
    /// Current vertical offset, preferring the legacy body value when set.
    #[must_use]
    pub fn offset(&self) -> f64 {
        if self.body_scroll_top != 0.0 && !self.body_scroll_top.is_nan() {
            self.body_scroll_top
        } else {
            self.scroll_top
        }
    }

    /// Scroll height minus viewport height.
    #[must_use]
    pub fn scrollable_height(&self) -> f64 {
        self.scroll_height - self.client_height
    }
}

// ── Capability trait ──────────────────────────────────────────────────────────

/// Read/write access to a live page.
///
/// Reads are infallible: unknown nodes read as empty.  Mutations return an
/// error for nodes the document does not own.
pub trait Document {
    /// `content` of the first `<meta property="…" content>` in the head.
    fn meta_property(&self, property: &str) -> Option<String>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &Selector) -> Vec<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Lowercase tag name.
    fn tag_name(&self, node: NodeId) -> String;

    /// Length of the rendered text in UTF-16 code units, as `innerText.length`
    /// reports it.  Characters outside the BMP count twice.
    fn text_len(&self, node: NodeId) -> usize;

    fn computed_style(&self, node: NodeId) -> ComputedStyle;

    fn offset_size(&self, node: NodeId) -> Size;

    fn scroll_metrics(&self) -> ScrollMetrics;

    fn body(&self) -> NodeId;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Set one inline style property (`element.style[property] = value`).
    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<()>;

    /// Register a document scroll listener.
    fn subscribe_scroll(&mut self) -> SubscriptionId;

    /// Remove a listener.  Returns `false` if it was not registered.
    fn unsubscribe_scroll(&mut self, id: SubscriptionId) -> bool;

    fn is_subscribed(&self, id: SubscriptionId) -> bool;
}
