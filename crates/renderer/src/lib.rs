//! Drawing side of the reading-progress overlay.
//!
//! - [`overlay`]: creates the track/fill pair and writes its inline styles
//! - [`tracker`]: turns scroll geometry into the fill's width

pub mod overlay;
pub mod tracker;

pub use overlay::Overlay;
pub use tracker::{adjusted_height, percent_css, progress_percent};
