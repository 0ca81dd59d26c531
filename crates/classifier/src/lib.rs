//! Long-form article detection.
//!
//! A page counts as an article when its Open Graph type says so, or when
//! enough of its text sits in substantial blocks.  Each block longer than the
//! length threshold contributes the square root of its excess, so a handful
//! of very long blocks cannot outweigh a body of ordinary paragraphs.

use readbar_config::ClassifierConfig;
use readbar_core::{Document, NodeId, Selector, SelectorPart};
use tracing::debug;

/// Result of inspecting a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    /// `<meta property="og:type" content="article">` is present.
    Declared,
    /// Text score exceeded the threshold.
    Article { score: f64 },
    /// Text score did not exceed the threshold.
    NotArticle { score: f64 },
}

impl Classification {
    #[must_use]
    pub fn is_article(self) -> bool {
        !matches!(self, Self::NotArticle { .. })
    }
}

/// Classify the page.  Never fails; an empty page is simply not an article.
pub fn classify<D: Document>(doc: &D, cfg: &ClassifierConfig) -> Classification {
    if doc.meta_property("og:type").as_deref() == Some("article") {
        debug!("og:type declares an article");
        return Classification::Declared;
    }

    let score = text_score(doc, cfg);
    debug!(score, threshold = cfg.score_threshold, "article score");

    if score > cfg.score_threshold {
        Classification::Article { score }
    } else {
        Classification::NotArticle { score }
    }
}

pub fn is_article<D: Document>(doc: &D, cfg: &ClassifierConfig) -> bool {
    classify(doc, cfg).is_article()
}

/// Sum of `sqrt(len - threshold)` over every candidate block longer than the
/// threshold.
pub fn text_score<D: Document>(doc: &D, cfg: &ClassifierConfig) -> f64 {
    candidate_nodes(doc)
        .into_iter()
        .map(|node| doc.text_len(node))
        .filter(|&len| len > cfg.node_length_threshold)
        .map(|len| ((len - cfg.node_length_threshold) as f64).sqrt())
        .sum()
}

/// Text-bearing blocks: every `p`, `pre` and `article`, followed by the
/// parent of each `div > br`.
///
/// The second group catches bodies written as `<br>`-separated text.  A div
/// is listed once per direct `<br>` child, so heavily broken text weighs more.
pub fn candidate_nodes<D: Document>(doc: &D) -> Vec<NodeId> {
    let mut nodes = doc.query_all(&Selector::tags(&["p", "pre", "article"]));

    let breaks = Selector(vec![SelectorPart::Child { parent: "div", child: "br" }]);
    nodes.extend(doc.query_all(&breaks).into_iter().filter_map(|br| doc.parent(br)));

    nodes
}
