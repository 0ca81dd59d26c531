use std::fmt;
use std::hash::{Hash, Hasher};

/// RGB colour as read from a computed style.
///
/// Channels keep the exact numeric value the style serialised, fractions
/// included, so two colours are equal only when their `rgb(r,g,b)` keys
/// match.  Alpha is dropped on parse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

// Parsing rejects non-finite channels, so equality is total.
impl Eq for Rgb {}

impl Hash for Rgb {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in [self.r, self.g, self.b] {
            // `+ 0.0` folds -0 into 0 to agree with `==`.
            (c + 0.0).to_bits().hash(state);
        }
    }
}

impl Rgb {
    /// Neutral accent used when the page offers nothing better.
    pub const DEFAULT_ACCENT: Self = Self { r: 50.0, g: 50.0, b: 50.0 }; // #323232

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self::from_channels(f64::from(r), f64::from(g), f64::from(b))
    }

    pub const fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string (`#RRGGBB` or `#RRGGBBAA`, alpha ignored).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');

        let byte = |s: &str| -> Option<u8> { u8::from_str_radix(s, 16).ok() };

        match hex.len() {
            6 | 8 => Some(Self::new(
                byte(hex.get(0..2)?)?,
                byte(hex.get(2..4)?)?,
                byte(hex.get(4..6)?)?,
            )),
            _ => None,
        }
    }

    /// Parse a serialised computed colour, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
    ///
    /// Whitespace is ignored and any fourth component is discarded.  Channels
    /// are taken as-is: no rounding, no clamping.  Returns `None` for
    /// keywords, hex, or fewer than three numeric channels.
    pub fn parse_css(value: &str) -> Option<Self> {
        let inner = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
            .unwrap_or(value);
        let inner = inner.strip_suffix(')').unwrap_or(inner);
        let compact: String = inner.chars().filter(|c| !c.is_whitespace()).collect();

        let mut channels = compact.split(',').map(channel);
        let r = channels.next()??;
        let g = channels.next()??;
        let b = channels.next()??;
        Some(Self { r, g, b })
    }

    /// `true` when every channel sits within `range` of the channel mean.
    ///
    /// Channels are truncated to integers first, fractions never tip a
    /// colour in or out of the gray band.
    #[must_use]
    pub fn is_gray(self, range: f64) -> bool {
        let [r, g, b] = [self.r, self.g, self.b].map(f64::trunc);
        let average = (r + g + b) / 3.0;
        [r, g, b]
            .iter()
            .all(|&c| average + range >= c && average - range <= c)
    }

    /// Weighted brightness used to gate accent candidates, on raw channels.
    ///
    /// The green weight is applied to the blue channel and green is never
    /// read.  This matches the long-standing behaviour of the overlay: changing
    /// it alters which site colours qualify.
    #[must_use]
    pub fn luminance(self) -> f64 {
        0.2126 * self.r + 0.7152 * self.b + 0.0722 * self.b
    }

    /// CSS value used for inline styles and colour identity, `rgb(r,g,b)`.
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r + 0.0, self.g + 0.0, self.b + 0.0)
    }
}

fn channel(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
