//! Anchors: a file plus an optional `Line N` / `Lines N-M` range that a
//! reviewer is deep-linked to.

mod hint;
mod range;

pub use hint::{HintMailbox, ScrollHint};
pub use range::{AnchorError, HighlightRange, RangeHighlighter};
