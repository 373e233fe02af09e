//! Highlight range parsing and row membership.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Why an anchor string did not produce a range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorError {
    #[error("unrecognized anchor: {0:?}")]
    Unrecognized(String),
    #[error("inverted range: {start} > {end}")]
    Inverted { start: u32, end: u32 },
    #[error("line number out of range in anchor {0:?}")]
    Overflow(String),
}

/// An inclusive range of 1-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HighlightRange {
    start: u32,
    end: u32,
}

impl HighlightRange {
    /// Build a range; `start > end` is rejected rather than swapped.
    pub fn new(start: u32, end: u32) -> Result<Self, AnchorError> {
        if start > end {
            return Err(AnchorError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering one line.
    pub fn single(line: u32) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Parse `Line N` or `Lines N-M`.
    pub fn parse(text: &str) -> Result<Self, AnchorError> {
        static SINGLE_REGEX: OnceLock<Regex> = OnceLock::new();
        static RANGE_REGEX: OnceLock<Regex> = OnceLock::new();

        let trimmed = text.trim();
        let single = SINGLE_REGEX.get_or_init(|| Regex::new(r"^Line\s+(\d+)$").unwrap());
        let range = RANGE_REGEX.get_or_init(|| Regex::new(r"^Lines\s+(\d+)\s*-\s*(\d+)$").unwrap());

        let number = |digits: &str| -> Result<u32, AnchorError> {
            digits
                .parse::<u32>()
                .map_err(|_| AnchorError::Overflow(trimmed.to_string()))
        };

        if let Some(caps) = single.captures(trimmed) {
            return Ok(Self::single(number(&caps[1])?));
        }
        if let Some(caps) = range.captures(trimmed) {
            return Self::new(number(&caps[1])?, number(&caps[2])?);
        }
        Err(AnchorError::Unrecognized(trimmed.to_string()))
    }

    /// Lenient form of [`HighlightRange::parse`]: malformed anchors mean no highlight.
    pub fn from_anchor(text: &str) -> Option<Self> {
        match Self::parse(text) {
            Ok(range) => Some(range),
            Err(AnchorError::Unrecognized(_)) => {
                log::debug!("Ignoring anchor text {:?}", text);
                None
            }
            Err(err) => {
                log::warn!("Rejected anchor {:?}: {}", text, err);
                None
            }
        }
    }

    /// Inclusive membership.
    pub fn contains(&self, line: u32) -> bool {
        self.start <= line && line <= self.end
    }
}

impl fmt::Display for HighlightRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "Line {}", self.start)
        } else {
            write!(f, "Lines {}-{}", self.start, self.end)
        }
    }
}

/// Flags rows that fall inside the active anchor, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeHighlighter {
    pub range: Option<HighlightRange>,
}

impl RangeHighlighter {
    pub fn new(range: Option<HighlightRange>) -> Self {
        Self { range }
    }

    pub fn should_highlight_line(&self, line: Option<u32>) -> bool {
        match (self.range, line) {
            (Some(range), Some(line)) => range.contains(line),
            _ => false,
        }
    }

    /// An anchor may point at either side of the diff, so both numbers are tested.
    pub fn should_highlight_row(&self, old_lineno: Option<u32>, new_lineno: Option<u32>) -> bool {
        self.should_highlight_line(old_lineno) || self.should_highlight_line(new_lineno)
    }
}
