use readbar_core::{Document, Selector};

/// Scrollable distance, less the height of every full-width footer.
///
/// A footer counts as full width when its rendered width equals the
/// viewport's client width exactly.  No guard against zero or negative
/// results: the caller divides by whatever this returns.
pub fn adjusted_height<D: Document>(doc: &D) -> f64 {
    let metrics = doc.scroll_metrics();
    let mut height = metrics.scrollable_height();

    for footer in doc.query_all(&Selector::tags(&["footer"])) {
        let size = doc.offset_size(footer);
        if size.width == metrics.client_width {
            height -= size.height;
        }
    }

    height
}

/// Reading progress as a percentage, unclamped.
///
/// Can exceed 100, go negative, or be infinite/NaN on degenerate pages.
pub fn progress_percent<D: Document>(doc: &D) -> f64 {
    doc.scroll_metrics().offset() / adjusted_height(doc) * 100.0
}

/// CSS width string for a percentage, using ECMAScript number formatting so
/// `10.0` renders `10%` and `100.0 / 9.0` renders `11.11111111111111%`.
pub fn percent_css(value: f64) -> String {
    format!("{}%", js_number(value))
}

/// `Number.prototype.toString()` for the values a progress ratio can take.
fn js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    // Exponential form: `1e-7`, `1.5e+21`.
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => formatted,
    }
}
