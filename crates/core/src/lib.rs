pub mod document;
pub mod error;
pub mod event;

pub use document::{
    ComputedStyle, Document, NodeId, ScrollMetrics, Selector, SelectorPart, Size,
};
pub use error::{ReadbarError, Result};
pub use event::{PageEvent, SubscriptionId};
