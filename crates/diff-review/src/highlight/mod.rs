//! Syntax tokenization boundary.
//!
//! The view hands a file's rendered rows to a tokenizer as one blob and
//! expects exactly one token row back per input row, in order.

mod highlighter;

pub use highlighter::DiffHighlighter;

use crate::model::HighlightedSpan;

/// External highlighter seam.
pub trait SyntaxTokenizer {
    /// Tokenize `code` (rows joined by `\n`). `language_hint` is usually the
    /// file path.
    fn tokenize(&mut self, code: &str, language_hint: &str) -> Vec<Vec<HighlightedSpan>>;
}

/// Tokenizer that leaves every row unstyled.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTokenizer;

impl SyntaxTokenizer for PlainTokenizer {
    fn tokenize(&mut self, code: &str, _language_hint: &str) -> Vec<Vec<HighlightedSpan>> {
        code.split('\n')
            .map(|row| vec![HighlightedSpan::plain(row)])
            .collect()
    }
}
