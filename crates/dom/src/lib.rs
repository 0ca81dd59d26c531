//! In-memory host page for `readbar`.
//!
//! Implements [`readbar_core::Document`] over a small arena tree whose styles
//! and geometry are declared up front, either programmatically through
//! [`ElementSpec`] builders or from a JSON [`PageFixture`].

pub mod document;
pub mod fixture;

pub use document::InMemoryDocument;
pub use fixture::{ElementSpec, PageFixture};
