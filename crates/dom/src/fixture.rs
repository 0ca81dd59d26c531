use readbar_core::{ComputedStyle, ReadbarError, Result, ScrollMetrics, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A recorded page: metadata, viewport, element tree and a scroll script.
///
/// ```json
/// {
///   "meta": { "og:type": "article" },
///   "viewport": { "scroll_height": 1050, "client_height": 550, "client_width": 1280 },
///   "body": [ { "tag": "p", "text": "…" } ],
///   "scroll": [0, 120, 480]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFixture {
    /// `<meta property=… content=…>` pairs in the head.
    pub meta: BTreeMap<String, String>,
    /// Scroll geometry at load time.
    pub viewport: ScrollMetrics,
    /// Report the scroll offset on `<body>` instead of the document element.
    pub quirks_mode: bool,
    /// Children of `<body>`.
    pub body: Vec<ElementSpec>,
    /// Offsets to scroll to, in order, after load.
    pub scroll: Vec<f64>,
}

impl PageFixture {
    /// Parse a fixture from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
            .map_err(|e| ReadbarError::Fixture(format!("'{}': {e}", path.display())))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| ReadbarError::Fixture(format!("JSON parse error: {e}")))
    }
}

/// Description of one element and its subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    /// Own text, rendered before any children.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub style: ComputedStyle,
    /// Rendered box; `width`/`height` at the top level of the JSON object.
    #[serde(flatten)]
    pub size: Size,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag:      tag.into().to_ascii_lowercase(),
            text:     String::new(),
            style:    ComputedStyle::default(),
            size:     Size::default(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.style.background_color = color.into();
        self
    }

    #[must_use]
    pub fn background_image(mut self, image: impl Into<String>) -> Self {
        self.style.background_image = image.into();
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.style.color = color.into();
        self
    }

    #[must_use]
    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.style.position = position.into();
        self
    }

    #[must_use]
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.size = Size { width, height };
        self
    }

    #[must_use]
    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}
