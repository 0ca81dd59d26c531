//! Accent colour extraction from the host page.
//!
//! Colours are sampled from generic containers and inline links, filtered
//! down to saturated mid-brightness values, and the most common survivor wins.

use crate::colors::Rgb;
use readbar_config::PaletteConfig;
use readbar_core::{Document, NodeId, Selector};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

/// Serialised computed value for a fully transparent background.
const TRANSPARENT: &str = "rgba(0, 0, 0, 0)";

/// `div, span, p > a`
fn candidate_selector() -> Selector {
    Selector::tags(&["div", "span"]).with_child("p", "a")
}

/// The colour an element contributes, as a raw computed CSS value.
///
/// Elements painted with a background image are unusable.  Links without a
/// background of their own fall back to their text colour; every other
/// element reports its background colour verbatim, transparent included.
pub fn element_color<D: Document>(doc: &D, node: NodeId) -> Option<String> {
    let computed = doc.computed_style(node);

    if computed.background_image != "none" {
        return None;
    }

    let background = computed.background_color;

    if doc.tag_name(node) == "a" && (background.is_empty() || background == TRANSPARENT) {
        return Some(computed.color);
    }

    Some(background)
}

/// Whether `color` may serve as an accent under `cfg`'s filters.
#[must_use]
pub fn is_accent_candidate(color: Rgb, cfg: &PaletteConfig) -> bool {
    let l = color.luminance();
    l > cfg.luminance_min && l < cfg.luminance_max && !color.is_gray(cfg.gray_range)
}

/// Pick the page's dominant non-neutral colour, or `None` when nothing
/// survives the gray and luminance filters.
pub fn extract_theme_color<D: Document>(doc: &D, cfg: &PaletteConfig) -> Option<Rgb> {
    let colors: Vec<Rgb> = doc
        .query_all(&candidate_selector())
        .into_iter()
        .filter_map(|node| element_color(doc, node))
        .filter_map(|raw| Rgb::parse_css(&raw))
        .filter(|&rgb| is_accent_candidate(rgb, cfg))
        .collect();

    let chosen = mode(&colors);
    debug!(candidates = colors.len(), chosen = ?chosen.map(Rgb::to_css), "theme color extraction");
    chosen
}

/// Colour of the first `position: fixed | sticky` header that has one.
///
/// No gray or luminance filtering is applied.  If that header's colour cannot
/// be parsed the search stops and `None` is returned.
pub fn header_color<D: Document>(doc: &D) -> Option<Rgb> {
    for header in doc.query_all(&Selector::tags(&["header"])) {
        let position = doc.computed_style(header).position;
        if position != "fixed" && position != "sticky" {
            continue;
        }
        if let Some(raw) = element_color(doc, header) {
            let rgb = Rgb::parse_css(&raw);
            debug!(%position, color = %raw, "pinned header found");
            return rgb;
        }
    }
    None
}

/// Most frequent item.
///
/// Ties go to the item whose last occurrence comes latest, which is what
/// taking the final element of a stable ascending-by-frequency sort yields.
pub fn mode<T: Copy + Eq + Hash>(items: &[T]) -> Option<T> {
    let mut tally: HashMap<T, (usize, usize)> = HashMap::new();
    for (index, &item) in items.iter().enumerate() {
        let entry = tally.entry(item).or_insert((0, index));
        entry.0 += 1;
        entry.1 = index;
    }

    tally
        .into_iter()
        .max_by_key(|&(_, (count, last))| (count, last))
        .map(|(item, _)| item)
}
