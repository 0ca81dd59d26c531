//! Progress overlay controller.
//!
//! Wires the pipeline together, once per page load:
//! - Article classification (`readbar-classifier`)
//! - Accent extraction and header collision check (`readbar-theme`)
//! - Track/fill insertion (`readbar-renderer`)
//! - Scroll subscription, recomputing the fill on every event

pub mod replay;

use readbar_classifier::{classify, Classification};
use readbar_config::ReadbarConfig;
use readbar_core::{Document, PageEvent, Result, SubscriptionId};
use readbar_renderer::Overlay;
use readbar_theme::{choose_accent, AccentChoice, Rgb};
use tracing::{debug, info, warn};

// ── Activation ────────────────────────────────────────────────────────────────

/// Why a page was left alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InactiveReason {
    /// The classifier did not consider the page long-form.
    NotArticle(Classification),
    /// The page accent equals a fixed/sticky header's colour.
    HeaderCollision(Rgb),
    /// Inserting the overlay failed.
    RenderFailed,
}

/// Controller state after load.  `Active` is terminal for the page's lifetime.
#[derive(Debug)]
pub enum Activation {
    Inactive(InactiveReason),
    Active(ProgressOverlay),
}

impl Activation {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    pub fn overlay(&self) -> Option<&ProgressOverlay> {
        match self {
            Self::Active(overlay) => Some(overlay),
            Self::Inactive(_) => None,
        }
    }
}

/// A live overlay: its elements, the accent it was painted with, and the
/// scroll listener keeping it current.
#[derive(Debug)]
pub struct ProgressOverlay {
    overlay:      Overlay,
    accent:       Rgb,
    subscription: SubscriptionId,
}

impl ProgressOverlay {
    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn accent(&self) -> Rgb {
        self.accent
    }

    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    /// Whether the scroll listener is still registered with `doc`.
    pub fn is_listening<D: Document>(&self, doc: &D) -> bool {
        doc.is_subscribed(self.subscription)
    }

    /// Scroll handler: rewrite the fill width for the current offset.
    pub fn on_scroll<D: Document>(&self, doc: &mut D) -> Result<()> {
        self.overlay.update(doc)
    }

    /// Drop the scroll listener.  The elements stay where they are.
    pub fn detach<D: Document>(&self, doc: &mut D) -> bool {
        doc.unsubscribe_scroll(self.subscription)
    }
}

/// Decide whether `doc` gets an overlay and, if so, insert it and start
/// listening for scroll events.
pub fn activate<D: Document>(doc: &mut D, config: &ReadbarConfig) -> Activation {
    let classification = classify(doc, &config.classifier);
    if !classification.is_article() {
        info!(?classification, "page is not an article; overlay skipped");
        return Activation::Inactive(InactiveReason::NotArticle(classification));
    }

    let accent = match choose_accent(doc, &config.palette) {
        AccentChoice::CollidesWithHeader(color) => {
            info!(color = %color, "accent matches pinned header; overlay skipped");
            return Activation::Inactive(InactiveReason::HeaderCollision(color));
        }
        AccentChoice::Extracted(color) => color,
        AccentChoice::Default(color) => {
            debug!("no usable page color; using default accent");
            color
        }
    };

    let overlay = match Overlay::render(doc, accent, &config.overlay) {
        Ok(overlay) => overlay,
        Err(e) => {
            warn!("Overlay render failed: {e}");
            return Activation::Inactive(InactiveReason::RenderFailed);
        }
    };

    let subscription = doc.subscribe_scroll();
    info!(accent = %accent, ?classification, "reading progress overlay active");

    Activation::Active(ProgressOverlay { overlay, accent, subscription })
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One page load: the document plus whatever the controller decided for it.
#[derive(Debug)]
pub struct Session<D> {
    doc:        D,
    activation: Activation,
}

impl<D: Document> Session<D> {
    /// Run activation against `doc`.
    pub fn start(mut doc: D, config: &ReadbarConfig) -> Self {
        let activation = activate(&mut doc, config);
        Self { doc, activation }
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    /// Deliver a host event.  Scrolls are ignored while no listener is
    /// registered; `Unload` releases the listener.
    pub fn dispatch(&mut self, event: PageEvent) -> Result<()> {
        let Activation::Active(overlay) = &self.activation else {
            return Ok(());
        };

        match event {
            PageEvent::Scroll => {
                if overlay.is_listening(&self.doc) {
                    overlay.on_scroll(&mut self.doc)?;
                }
            }
            PageEvent::Unload => {
                if overlay.detach(&mut self.doc) {
                    debug!("scroll listener released");
                }
            }
        }
        Ok(())
    }

    pub fn into_document(self) -> D {
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readbar_core::{ComputedStyle, NodeId, ReadbarError, ScrollMetrics, Selector, Size};
    use readbar_dom::{ElementSpec, InMemoryDocument};

    const BLUE: &str = "rgb(20, 40, 160)";

    fn metrics() -> ScrollMetrics {
        ScrollMetrics {
            scroll_height: 1050.0,
            client_height: 550.0,
            client_width:  1280.0,
            ..Default::default()
        }
    }

    fn article() -> InMemoryDocument {
        let mut doc = InMemoryDocument::new();
        doc.add_meta("og:type", "article");
        doc.set_metrics(metrics());
        doc
    }

    fn div_count(doc: &InMemoryDocument) -> usize {
        doc.query_all(&Selector::tags(&["div"])).len()
    }

    #[test]
    fn short_page_stays_inactive() {
        let mut doc = InMemoryDocument::new();
        let body = doc.body();
        doc.insert(body, ElementSpec::new("p").text("too short")).unwrap();

        let session = Session::start(doc, &ReadbarConfig::default());
        assert!(matches!(
            session.activation(),
            Activation::Inactive(InactiveReason::NotArticle(_))
        ));
        assert_eq!(div_count(session.document()), 0);
        assert_eq!(session.document().listener_count(), 0);
    }

    #[test]
    fn long_text_activates_without_metadata() {
        let mut doc = InMemoryDocument::new();
        doc.set_metrics(metrics());
        let body = doc.body();
        doc.insert(body, ElementSpec::new("p").text("w".repeat(150 + 1601))).unwrap();

        let session = Session::start(doc, &ReadbarConfig::default());
        assert!(session.activation().is_active());
    }

    #[test]
    fn declared_article_gets_default_accent() {
        let session = Session::start(article(), &ReadbarConfig::default());
        let overlay = session.activation().overlay().expect("active");
        assert_eq!(overlay.accent(), Rgb::new(50, 50, 50));

        let fill = overlay.overlay().fill;
        assert_eq!(session.document().inline_style(fill, "background"), Some("rgb(50,50,50)"));
        assert_eq!(session.document().inline_style(fill, "width"), Some("0%"));
        assert!(overlay.is_listening(session.document()));
    }

    #[test]
    fn page_color_becomes_accent() {
        let mut doc = article();
        let body = doc.body();
        doc.insert(body, ElementSpec::new("div").background(BLUE)).unwrap();

        let session = Session::start(doc, &ReadbarConfig::default());
        let overlay = session.activation().overlay().expect("active");
        assert_eq!(overlay.accent(), Rgb::new(20, 40, 160));
    }

    #[test]
    fn header_collision_creates_nothing() {
        let mut doc = article();
        let body = doc.body();
        doc.insert(body, ElementSpec::new("header").position("fixed").background(BLUE)).unwrap();
        doc.insert(body, ElementSpec::new("div").background(BLUE)).unwrap();
        let before = div_count(&doc);

        let session = Session::start(doc, &ReadbarConfig::default());
        assert!(matches!(
            session.activation(),
            Activation::Inactive(InactiveReason::HeaderCollision(_))
        ));
        assert_eq!(div_count(session.document()), before);
        assert_eq!(session.document().children(body).len(), 2);
        assert_eq!(session.document().listener_count(), 0);
    }

    #[test]
    fn scroll_events_recompute_width() {
        let mut session = Session::start(article(), &ReadbarConfig::default());
        let fill = session.activation().overlay().expect("active").overlay().fill;

        session.document_mut().scroll_to(50.0);
        session.dispatch(PageEvent::Scroll).unwrap();
        assert_eq!(session.document().inline_style(fill, "width"), Some("10%"));

        session.document_mut().scroll_to(500.0);
        session.dispatch(PageEvent::Scroll).unwrap();
        assert_eq!(session.document().inline_style(fill, "width"), Some("100%"));

        session.document_mut().scroll_to(50.0);
        session.dispatch(PageEvent::Scroll).unwrap();
        assert_eq!(session.document().inline_style(fill, "width"), Some("10%"));
    }

    #[test]
    fn footer_adjusts_live_progress() {
        let mut doc = article();
        let body = doc.body();
        doc.insert(body, ElementSpec::new("footer").size(1280.0, 50.0)).unwrap();

        let mut session = Session::start(doc, &ReadbarConfig::default());
        let fill = session.activation().overlay().expect("active").overlay().fill;

        session.document_mut().scroll_to(50.0);
        session.dispatch(PageEvent::Scroll).unwrap();
        assert_eq!(
            session.document().inline_style(fill, "width"),
            Some("11.11111111111111%")
        );
    }

    #[test]
    fn unload_stops_tracking() {
        let mut session = Session::start(article(), &ReadbarConfig::default());
        let overlay = session.activation().overlay().expect("active");
        let fill = overlay.overlay().fill;
        let track = overlay.overlay().track;

        session.dispatch(PageEvent::Unload).unwrap();
        assert_eq!(session.document().listener_count(), 0);

        session.document_mut().scroll_to(250.0);
        session.dispatch(PageEvent::Scroll).unwrap();
        assert_eq!(session.document().inline_style(fill, "width"), Some("0%"));

        // Still active; the elements are left in place.
        assert!(session.activation().is_active());
        let body = session.document().body();
        assert!(session.document().children(body).contains(&track));
    }

    /// Which `Document` call a [`Faulty`] page rejects.
    #[derive(Clone, Copy)]
    enum Fault {
        /// The initial progress width (scrolled page, so not `0%`).
        FillWidth,
        BodyAppend,
    }

    /// In-memory page that fails one kind of mutation.
    struct Faulty {
        inner: InMemoryDocument,
        fault: Fault,
    }

    impl Document for Faulty {
        fn meta_property(&self, property: &str) -> Option<String> {
            self.inner.meta_property(property)
        }
        fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
            self.inner.query_all(selector)
        }
        fn parent(&self, node: NodeId) -> Option<NodeId> {
            self.inner.parent(node)
        }
        fn tag_name(&self, node: NodeId) -> String {
            self.inner.tag_name(node)
        }
        fn text_len(&self, node: NodeId) -> usize {
            self.inner.text_len(node)
        }
        fn computed_style(&self, node: NodeId) -> ComputedStyle {
            self.inner.computed_style(node)
        }
        fn offset_size(&self, node: NodeId) -> Size {
            self.inner.offset_size(node)
        }
        fn scroll_metrics(&self) -> ScrollMetrics {
            self.inner.scroll_metrics()
        }
        fn body(&self) -> NodeId {
            self.inner.body()
        }
        fn create_element(&mut self, tag: &str) -> NodeId {
            self.inner.create_element(tag)
        }
        fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
            if matches!(self.fault, Fault::BodyAppend) && parent == self.inner.body() {
                return Err(ReadbarError::Dom("body is read-only".into()));
            }
            self.inner.append_child(parent, child)
        }
        fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<()> {
            // Rejects the live width write, not the static `0%` / `100%` ones.
            let live = property == "width" && value != "100%" && value != "0%";
            if matches!(self.fault, Fault::FillWidth) && live {
                return Err(ReadbarError::Dom("style rejected".into()));
            }
            self.inner.set_style(node, property, value)
        }
        fn subscribe_scroll(&mut self) -> SubscriptionId {
            self.inner.subscribe_scroll()
        }
        fn unsubscribe_scroll(&mut self, id: SubscriptionId) -> bool {
            self.inner.unsubscribe_scroll(id)
        }
        fn is_subscribed(&self, id: SubscriptionId) -> bool {
            self.inner.is_subscribed(id)
        }
    }

    #[test]
    fn failed_render_leaves_body_untouched() {
        for fault in [Fault::FillWidth, Fault::BodyAppend] {
            let mut inner = article();
            inner.scroll_to(50.0);
            let body = inner.body();
            inner.insert(body, ElementSpec::new("p").text("intro")).unwrap();
            let before = inner.children(body).to_vec();

            let session = Session::start(Faulty { inner, fault }, &ReadbarConfig::default());
            assert!(matches!(
                session.activation(),
                Activation::Inactive(InactiveReason::RenderFailed)
            ));

            let doc = &session.document().inner;
            assert_eq!(doc.children(body), before.as_slice());
            assert_eq!(div_count(doc), 0);
            assert_eq!(doc.listener_count(), 0);
        }
    }

    #[test]
    fn inactive_session_ignores_events() {
        let mut session = Session::start(InMemoryDocument::new(), &ReadbarConfig::default());
        session.dispatch(PageEvent::Scroll).unwrap();
        session.dispatch(PageEvent::Unload).unwrap();
        assert!(!session.activation().is_active());
    }
}
