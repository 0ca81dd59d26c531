pub mod colors;
pub mod palette;

pub use colors::Rgb;
pub use palette::{element_color, extract_theme_color, header_color, is_accent_candidate, mode};

use readbar_config::PaletteConfig;

/// Outcome of choosing the overlay's accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccentChoice {
    /// Colour sampled from the page.
    Extracted(Rgb),
    /// Nothing usable on the page; the configured default applies.
    Default(Rgb),
    /// The page colour equals a pinned header's colour, so a bar flush
    /// against it would be invisible.
    CollidesWithHeader(Rgb),
}

impl AccentChoice {
    /// Colour to paint with, `None` when the overlay should be skipped.
    pub fn paint(self) -> Option<Rgb> {
        match self {
            Self::Extracted(c) | Self::Default(c) => Some(c),
            Self::CollidesWithHeader(_) => None,
        }
    }
}

/// Configured fallback accent.  Invalid hex strings fall back to
/// [`Rgb::DEFAULT_ACCENT`].
pub fn default_accent(cfg: &PaletteConfig) -> Rgb {
    Rgb::from_hex(&cfg.default_accent).unwrap_or(Rgb::DEFAULT_ACCENT)
}

/// Extract the page accent and check it against any pinned header.
pub fn choose_accent<D: readbar_core::Document>(doc: &D, cfg: &PaletteConfig) -> AccentChoice {
    let theme = extract_theme_color(doc, cfg);
    let header = header_color(doc);

    match theme {
        Some(color) if Some(color) == header => AccentChoice::CollidesWithHeader(color),
        Some(color) => AccentChoice::Extracted(color),
        None => AccentChoice::Default(default_accent(cfg)),
    }
}
