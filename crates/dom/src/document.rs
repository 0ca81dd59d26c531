use crate::fixture::{ElementSpec, PageFixture};
use readbar_core::{
    ComputedStyle, Document, NodeId, ReadbarError, Result, ScrollMetrics, Selector, Size,
    SubscriptionId,
};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone)]
struct Node {
    tag:      String,
    text:     String,
    parent:   Option<NodeId>,
    children: Vec<NodeId>,
    style:    ComputedStyle,
    size:     Size,
    /// Inline styles in assignment order; later writes replace earlier ones.
    inline:   Vec<(String, String)>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag:      tag.to_ascii_lowercase(),
            text:     String::new(),
            parent:   None,
            children: Vec::new(),
            style:    ComputedStyle::default(),
            size:     Size::default(),
            inline:   Vec::new(),
        }
    }
}

/// Arena-backed page model implementing [`Document`].
///
/// Starts as `<html><head/><body/></html>`.  Styles and geometry are whatever
/// the caller declares; nothing is laid out.  Elements created through
/// [`Document::create_element`] stay detached until appended.
#[derive(Debug, Clone)]
pub struct InMemoryDocument {
    nodes:       Vec<Node>,
    root:        NodeId,
    body:        NodeId,
    meta:        Vec<(String, String)>,
    metrics:     ScrollMetrics,
    quirks_mode: bool,
    listeners:   BTreeSet<SubscriptionId>,
    next_listener: u64,
}

impl Default for InMemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocument {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes:       Vec::new(),
            root:        NodeId(0),
            body:        NodeId(0),
            meta:        Vec::new(),
            metrics:     ScrollMetrics::default(),
            quirks_mode: false,
            listeners:   BTreeSet::new(),
            next_listener: 0,
        };
        let root = doc.alloc(Node::new("html"));
        let head = doc.alloc(Node::new("head"));
        let body = doc.alloc(Node::new("body"));
        doc.link(root, head);
        doc.link(root, body);
        doc.root = root;
        doc.body = body;
        doc
    }

    /// Build a page from a recorded fixture.
    pub fn from_fixture(fixture: &PageFixture) -> Self {
        let mut doc = Self::new();
        for (property, content) in &fixture.meta {
            doc.add_meta(property, content);
        }
        doc.metrics = fixture.viewport;
        doc.quirks_mode = fixture.quirks_mode;
        let body = doc.body;
        for spec in &fixture.body {
            doc.insert_subtree(body, spec.clone());
        }
        debug!(nodes = doc.nodes.len(), "page built from fixture");
        doc
    }

    /// Declare `<meta property="…" content="…">` in the head.
    pub fn add_meta(&mut self, property: impl Into<String>, content: impl Into<String>) {
        self.meta.push((property.into(), content.into()));
    }

    /// Attach `spec` and its subtree as the last child of `parent`.
    pub fn insert(&mut self, parent: NodeId, spec: ElementSpec) -> Result<NodeId> {
        if !self.contains(parent) {
            return Err(ReadbarError::Dom(format!("insert into {parent:?}: unknown node")));
        }
        Ok(self.insert_subtree(parent, spec))
    }

    /// `parent` must exist.
    fn insert_subtree(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let ElementSpec { tag, text, style, size, children } = spec;
        let mut node = Node::new(&tag);
        node.text = text;
        node.style = style;
        node.size = size;
        let id = self.alloc(node);
        self.link(parent, id);
        for child in children {
            self.insert_subtree(id, child);
        }
        id
    }

    pub fn set_metrics(&mut self, metrics: ScrollMetrics) {
        self.metrics = metrics;
    }

    /// Report scroll offsets on `<body>` like a quirks-mode page.
    pub fn set_quirks_mode(&mut self, quirks: bool) {
        self.quirks_mode = quirks;
    }

    /// Move the viewport.  Listeners are not invoked; the host delivers
    /// the matching scroll event.
    pub fn scroll_to(&mut self, offset: f64) {
        if self.quirks_mode {
            self.metrics.body_scroll_top = offset;
            self.metrics.scroll_top = 0.0;
        } else {
            self.metrics.scroll_top = offset;
            self.metrics.body_scroll_top = 0.0;
        }
    }

    /// Detach `node` from its parent, if it has one.
    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        let n = self
            .nodes
            .get_mut(node.0)
            .ok_or_else(|| ReadbarError::Dom(format!("remove {node:?}: unknown node")))?;
        if let Some(parent) = n.parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
        Ok(())
    }

    /// Current inline value of `property` on `node`.
    pub fn inline_style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes
            .get(node.0)?
            .inline
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node.0).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Number of registered scroll listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.nodes[child.0].parent {
            self.nodes[old.0].children.retain(|&c| c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    fn collect_text(&self, node: NodeId, out: &mut usize) {
        let n = &self.nodes[node.0];
        if n.tag == "br" {
            *out += 1;
        }
        *out += n.text.encode_utf16().count();
        for &child in &n.children {
            self.collect_text(child, out);
        }
    }

    fn walk(&self, node: NodeId, selector: &Selector, out: &mut Vec<NodeId>) {
        let n = &self.nodes[node.0];
        let parent_tag = n.parent.map(|p| self.nodes[p.0].tag.as_str());
        if selector.matches(&n.tag, parent_tag) {
            out.push(node);
        }
        for &child in &n.children {
            self.walk(child, selector, out);
        }
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes[current.0].parent;
        }
        false
    }
}

impl Document for InMemoryDocument {
    fn meta_property(&self, property: &str) -> Option<String> {
        self.meta
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, content)| content.clone())
    }

    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(self.root, selector, &mut out);
        out
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.nodes.get(node.0).map(|n| n.tag.clone()).unwrap_or_default()
    }

    fn text_len(&self, node: NodeId) -> usize {
        if !self.contains(node) {
            return 0;
        }
        let mut len = 0;
        self.collect_text(node, &mut len);
        len
    }

    fn computed_style(&self, node: NodeId) -> ComputedStyle {
        self.nodes.get(node.0).map(|n| n.style.clone()).unwrap_or_default()
    }

    fn offset_size(&self, node: NodeId) -> Size {
        self.nodes.get(node.0).map(|n| n.size).unwrap_or_default()
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    fn body(&self) -> NodeId {
        self.body
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::new(tag))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(ReadbarError::Dom(format!(
                "append {child:?} to {parent:?}: unknown node"
            )));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(ReadbarError::Dom(format!(
                "append {child:?} to {parent:?}: would create a cycle"
            )));
        }
        self.link(parent, child);
        Ok(())
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<()> {
        let n = self
            .nodes
            .get_mut(node.0)
            .ok_or_else(|| ReadbarError::Dom(format!("style {node:?}: unknown node")))?;
        match n.inline.iter_mut().find(|(p, _)| p == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => n.inline.push((property.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn subscribe_scroll(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id);
        id
    }

    fn unsubscribe_scroll(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id)
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.listeners.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_returns_document_order() {
        let mut doc = InMemoryDocument::new();
        let body = doc.body();
        let p1 = doc.insert(body, ElementSpec::new("p")).unwrap();
        let article = doc.insert(body, ElementSpec::new("article").child(ElementSpec::new("P"))).unwrap();
        let nested = doc.children(article)[0];
        let p2 = doc.insert(body, ElementSpec::new("pre")).unwrap();

        let found = doc.query_all(&Selector::tags(&["p", "pre", "article"]));
        assert_eq!(found, vec![p1, article, nested, p2]);
    }

    #[test]
    fn child_combinator_checks_direct_parent() {
        let mut doc = InMemoryDocument::new();
        let body = doc.body();
        let div = doc.insert(
            body,
            ElementSpec::new("div")
                .child(ElementSpec::new("br"))
                .child(ElementSpec::new("span").child(ElementSpec::new("br"))),
        ).unwrap();
        let found = doc.query_all(&Selector(vec![readbar_core::SelectorPart::Child {
            parent: "div",
            child:  "br",
        }]));
        assert_eq!(found.len(), 1);
        assert_eq!(doc.parent(found[0]), Some(div));
    }

    #[test]
    fn text_len_includes_descendants_and_line_breaks() {
        let mut doc = InMemoryDocument::new();
        let body = doc.body();
        let div = doc.insert(
            body,
            ElementSpec::new("div")
                .text("abc")
                .child(ElementSpec::new("br"))
                .child(ElementSpec::new("span").text("déf")),
        ).unwrap();
        assert_eq!(doc.text_len(div), 7);
    }

    #[test]
    fn text_len_counts_utf16_units() {
        let mut doc = InMemoryDocument::new();
        let body = doc.body();
        let p = doc.insert(body, ElementSpec::new("p").text("a😀é")).unwrap();
        assert_eq!(doc.text_len(p), 4);
    }

    #[test]
    fn insert_under_unknown_parent_is_an_error() {
        let mut doc = InMemoryDocument::new();
        let err = doc.insert(NodeId(999), ElementSpec::new("p")).unwrap_err();
        assert!(matches!(err, ReadbarError::Dom(_)));
        assert!(doc.query_all(&Selector::tags(&["p"])).is_empty());
    }

    #[test]
    fn remove_detaches_subtree() {
        let mut doc = InMemoryDocument::new();
        let body = doc.body();
        let div = doc.insert(body, ElementSpec::new("div").child(ElementSpec::new("p"))).unwrap();
        doc.remove(div).unwrap();
        assert!(doc.children(body).is_empty());
        assert!(doc.query_all(&Selector::tags(&["div", "p"])).is_empty());
        assert!(doc.remove(NodeId(999)).is_err());
    }

    #[test]
    fn detached_elements_are_not_queried() {
        let mut doc = InMemoryDocument::new();
        let div = doc.create_element("div");
        assert!(doc.query_all(&Selector::tags(&["div"])).is_empty());

        let body = doc.body();
        doc.append_child(body, div).unwrap();
        assert_eq!(doc.query_all(&Selector::tags(&["div"])), vec![div]);
    }

    #[test]
    fn append_rejects_unknown_and_cyclic_nodes() {
        let mut doc = InMemoryDocument::new();
        let body = doc.body();
        assert!(doc.append_child(body, NodeId(999)).is_err());
        let root = doc.parent(body).unwrap();
        assert!(doc.append_child(body, root).is_err());
    }

    #[test]
    fn inline_styles_overwrite() {
        let mut doc = InMemoryDocument::new();
        let div = doc.create_element("div");
        doc.set_style(div, "width", "0%").unwrap();
        doc.set_style(div, "width", "42%").unwrap();
        assert_eq!(doc.inline_style(div, "width"), Some("42%"));
        assert_eq!(doc.inline_style(div, "height"), None);
        assert!(doc.set_style(NodeId(999), "width", "1%").is_err());
    }

    #[test]
    fn quirks_mode_scrolls_body() {
        let mut doc = InMemoryDocument::new();
        doc.set_quirks_mode(true);
        doc.scroll_to(80.0);
        let m = doc.scroll_metrics();
        assert_eq!(m.body_scroll_top, 80.0);
        assert_eq!(m.scroll_top, 0.0);
        assert_eq!(m.offset(), 80.0);
    }

    #[test]
    fn subscriptions_are_tracked() {
        let mut doc = InMemoryDocument::new();
        let id = doc.subscribe_scroll();
        assert!(doc.is_subscribed(id));
        assert!(doc.unsubscribe_scroll(id));
        assert!(!doc.unsubscribe_scroll(id));
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn fixture_meta_and_body_are_applied() {
        let fixture = PageFixture::from_json(
            r#"{ "meta": { "og:type": "website" }, "body": [ { "tag": "p", "text": "hi" } ] }"#,
        )
        .unwrap();
        let doc = InMemoryDocument::from_fixture(&fixture);
        assert_eq!(doc.meta_property("og:type").as_deref(), Some("website"));
        assert_eq!(doc.meta_property("og:title"), None);
        let p = doc.query_all(&Selector::tags(&["p"]));
        assert_eq!(p.len(), 1);
        assert_eq!(doc.text_len(p[0]), 2);
    }
}
