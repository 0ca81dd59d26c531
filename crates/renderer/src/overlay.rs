use crate::tracker::{percent_css, progress_percent};
use readbar_config::OverlayConfig;
use readbar_core::{Document, NodeId, Result};
use readbar_theme::Rgb;
use tracing::debug;

/// The two elements making up the progress bar.
///
/// `track` is a transparent full-width strip pinned to the top of the
/// viewport; `fill` sits inside it and its width is the only thing that
/// changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub track: NodeId,
    pub fill:  NodeId,
}

impl Overlay {
    /// Create and style the track and fill, size the fill for the current
    /// scroll position, then insert them under `<body>`.
    ///
    /// On error nothing has been attached to the body.
    pub fn render<D: Document>(doc: &mut D, accent: Rgb, cfg: &OverlayConfig) -> Result<Self> {
        let track = doc.create_element("div");
        let fill = doc.create_element("div");
        let height = format!("{}px", cfg.height_px);
        let z_index = cfg.z_index.to_string();
        let accent = accent.to_css();

        for (property, value) in [
            ("background", "transparent"),
            ("width",      "100%"),
            ("height",     height.as_str()),
            ("position",   "fixed"),
            ("top",        "0"),
            ("left",       "0"),
            ("z-index",    z_index.as_str()),
        ] {
            doc.set_style(track, property, value)?;
        }

        for (property, value) in [
            ("width",      "0%"),
            ("height",     height.as_str()),
            ("position",   "absolute"),
            ("top",        "0"),
            ("left",       "0"),
            ("background", accent.as_str()),
        ] {
            doc.set_style(fill, property, value)?;
        }

        // Attach to the body last so a failure leaves the page untouched.
        let overlay = Self { track, fill };
        overlay.update(doc)?;
        doc.append_child(track, fill)?;
        let body = doc.body();
        doc.append_child(body, track)?;

        debug!(?track, ?fill, %accent, "overlay inserted");
        Ok(overlay)
    }

    /// Recompute the fill width from the current scroll position.
    ///
    /// Recomputed from scratch every call, so it cannot drift.
    pub fn update<D: Document>(&self, doc: &mut D) -> Result<()> {
        let width = percent_css(progress_percent(doc));
        doc.set_style(self.fill, "width", &width)
    }
}
