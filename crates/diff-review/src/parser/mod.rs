//! Parsers turning raw diff text into the diff model.

mod unified;

pub use unified::{parse_unified_diff, ParseError};
