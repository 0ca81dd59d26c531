use readbar_core::{ReadbarError, Result};
use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `readbar.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadbarConfig {
    /// Article detection thresholds.
    pub classifier: ClassifierConfig,
    /// Accent color extraction filters.
    pub palette: PaletteConfig,
    /// Overlay geometry.
    pub overlay: OverlayConfig,
    /// Host-side scroll replay settings.
    pub replay: ReplayConfig,
}

impl ReadbarConfig {
    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(ReadbarError::Config(msg));

        let score = self.classifier.score_threshold;
        if !score.is_finite() || score < 0.0 {
            return fail(format!("classifier.score_threshold must be >= 0, got {score}"));
        }

        let palette = &self.palette;
        if !(palette.luminance_min.is_finite() && palette.luminance_max.is_finite()) {
            return fail("palette luminance bounds must be finite".into());
        }
        if palette.luminance_min >= palette.luminance_max {
            return fail(format!(
                "palette.luminance_min ({}) must be below luminance_max ({})",
                palette.luminance_min, palette.luminance_max
            ));
        }
        if !palette.gray_range.is_finite() || palette.gray_range < 0.0 {
            return fail(format!("palette.gray_range must be >= 0, got {}", palette.gray_range));
        }

        if self.overlay.height_px == 0 {
            return fail("overlay.height_px must be at least 1".into());
        }
        Ok(())
    }
}

/// Article classifier thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Total score a page must exceed to count as an article.
    pub score_threshold: f64,
    /// Text blocks shorter than or equal to this many characters score nothing.
    pub node_length_threshold: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            score_threshold:       40.0,
            node_length_threshold: 150,
        }
    }
}

/// Filters applied to candidate accent colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Exclusive lower bound of the luminance window.
    pub luminance_min: f64,
    /// Exclusive upper bound of the luminance window.
    pub luminance_max: f64,
    /// A color is gray when every channel is within this distance of the mean.
    pub gray_range: f64,
    /// Accent used when the page yields no usable color (hex, e.g. `"#323232"`).
    pub default_accent: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            luminance_min:  35.0,
            luminance_max:  180.0,
            gray_range:     10.0,
            default_accent: "#323232".to_string(), // rgb(50, 50, 50)
        }
    }
}

/// Track / fill geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Bar height in CSS pixels.
    pub height_px: u32,
    /// Stacking order of the track.
    pub z_index: i64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            height_px: 4,
            z_index:   999_999,
        }
    }
}

/// Scroll replay used by the `readbar` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Delay between replayed scroll events (milliseconds).
    pub interval_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self { interval_ms: 16 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_other_defaults() {
        let cfg: ReadbarConfig = toml::from_str(
            r#"
            [classifier]
            score_threshold = 25.0

            [overlay]
            height_px = 6
            "#,
        )
        .unwrap();

        assert_eq!(cfg.classifier.score_threshold, 25.0);
        assert_eq!(cfg.classifier.node_length_threshold, 150);
        assert_eq!(cfg.overlay.height_px, 6);
        assert_eq!(cfg.overlay.z_index, 999_999);
        assert_eq!(cfg.palette.default_accent, "#323232");
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg: ReadbarConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.palette.luminance_min, 35.0);
        assert_eq!(cfg.palette.luminance_max, 180.0);
        assert_eq!(cfg.replay.interval_ms, 16);
    }

    #[test]
    fn defaults_validate() {
        assert!(ReadbarConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_luminance_window_is_rejected() {
        let mut cfg = ReadbarConfig::default();
        cfg.palette.luminance_min = 180.0;
        assert!(matches!(cfg.validate(), Err(ReadbarError::Config(_))));

        cfg.palette.luminance_min = f64::NAN;
        assert!(cfg.validate().is_err());
    }
}
