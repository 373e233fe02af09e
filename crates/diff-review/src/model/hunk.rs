//! Hunks: maximal runs of rendered rows sharing one change type.

use super::ChangeType;
use thiserror::Error;

/// A contiguous run of rendered rows with the same change type.
///
/// Rows are addressed by their 0-based rendered index, `[start_line, end_line)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// One entry per rendered row.
    pub text: Vec<String>,
    /// First rendered row (inclusive).
    pub start_line: usize,
    /// One past the last rendered row.
    pub end_line: usize,
    /// Change type shared by every row.
    pub change_type: ChangeType,
}

impl Hunk {
    /// Number of rendered rows in this hunk.
    pub fn len(&self) -> usize {
        self.end_line - self.start_line
    }

    /// Hunks produced by the builder are never empty.
    pub fn is_empty(&self) -> bool {
        self.start_line == self.end_line
    }

    /// Whether the rendered row falls inside this hunk.
    pub fn contains(&self, row: usize) -> bool {
        self.start_line <= row && row < self.end_line
    }
}

/// Violations of the ordering invariant `HunkList` guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HunkOrderError {
    #[error("first hunk starts at row {0}, expected 0")]
    DoesNotStartAtZero(usize),
    #[error("hunk {index} is empty or reversed ({start_line}..{end_line})")]
    Empty {
        index: usize,
        start_line: usize,
        end_line: usize,
    },
    #[error("hunk {index} starts at row {start_line} but the previous hunk ends at {previous_end}")]
    Gap {
        index: usize,
        previous_end: usize,
        start_line: usize,
    },
    #[error("hunk {index} holds {text_rows} text rows for a span of {span} rows")]
    TextMismatch {
        index: usize,
        text_rows: usize,
        span: usize,
    },
}

/// Hunks in ascending, non-overlapping, contiguous order.
///
/// Row lookups binary search this list, so the ordering is checked on
/// construction instead of being assumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HunkList {
    hunks: Vec<Hunk>,
}

impl HunkList {
    /// Validate and wrap a list of hunks.
    pub fn new(hunks: Vec<Hunk>) -> Result<Self, HunkOrderError> {
        Self::validate(&hunks)?;
        Ok(Self { hunks })
    }

    fn validate(hunks: &[Hunk]) -> Result<(), HunkOrderError> {
        if let Some(first) = hunks.first() {
            if first.start_line != 0 {
                return Err(HunkOrderError::DoesNotStartAtZero(first.start_line));
            }
        }

        let mut previous_end = 0;
        for (index, hunk) in hunks.iter().enumerate() {
            if hunk.start_line >= hunk.end_line {
                return Err(HunkOrderError::Empty {
                    index,
                    start_line: hunk.start_line,
                    end_line: hunk.end_line,
                });
            }
            if hunk.start_line != previous_end {
                return Err(HunkOrderError::Gap {
                    index,
                    previous_end,
                    start_line: hunk.start_line,
                });
            }
            if hunk.text.len() != hunk.len() {
                return Err(HunkOrderError::TextMismatch {
                    index,
                    text_rows: hunk.text.len(),
                    span: hunk.len(),
                });
            }
            previous_end = hunk.end_line;
        }
        Ok(())
    }

    /// Number of hunks.
    pub fn len(&self) -> usize {
        self.hunks.len()
    }

    /// True when there are no hunks.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Total rendered rows covered by the list.
    pub fn total_rows(&self) -> usize {
        self.hunks.last().map(|h| h.end_line).unwrap_or(0)
    }

    /// Hunks in row order.
    pub fn iter(&self) -> std::slice::Iter<'_, Hunk> {
        self.hunks.iter()
    }

    /// Borrow the hunks as a slice.
    pub fn as_slice(&self) -> &[Hunk] {
        &self.hunks
    }

    /// Every rendered row, joined by `\n`: the blob handed to the tokenizer.
    pub fn joined_text(&self) -> String {
        self.hunks
            .iter()
            .flat_map(|h| h.text.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a HunkList {
    type Item = &'a Hunk;
    type IntoIter = std::slice::Iter<'a, Hunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.hunks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hunk(start: usize, end: usize, change_type: ChangeType) -> Hunk {
        Hunk {
            text: (start..end).map(|i| format!("row {i}")).collect(),
            start_line: start,
            end_line: end,
            change_type,
        }
    }

    #[test]
    fn test_accepts_contiguous_hunks() {
        let list = HunkList::new(vec![
            hunk(0, 2, ChangeType::Add),
            hunk(2, 3, ChangeType::Unchanged),
        ])
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.total_rows(), 3);
        assert_eq!(list.joined_text(), "row 0\nrow 1\nrow 2");
    }

    #[test]
    fn test_rejects_gap() {
        let err = HunkList::new(vec![
            hunk(0, 2, ChangeType::Add),
            hunk(3, 4, ChangeType::Remove),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            HunkOrderError::Gap {
                index: 1,
                previous_end: 2,
                start_line: 3
            }
        );
    }

    #[test]
    fn test_rejects_unsorted_and_offset_start() {
        let err = HunkList::new(vec![hunk(1, 2, ChangeType::Add)]).unwrap_err();
        assert_eq!(err, HunkOrderError::DoesNotStartAtZero(1));

        let err = HunkList::new(vec![
            hunk(0, 2, ChangeType::Add),
            hunk(0, 2, ChangeType::Remove),
        ])
        .unwrap_err();
        assert!(matches!(err, HunkOrderError::Gap { index: 1, .. }));
    }

    #[test]
    fn test_rejects_empty_hunk() {
        let mut empty = hunk(0, 1, ChangeType::Add);
        empty.end_line = 0;
        empty.text.clear();
        assert!(matches!(
            HunkList::new(vec![empty]),
            Err(HunkOrderError::Empty { index: 0, .. })
        ));
    }

    #[test]
    fn test_empty_list_is_valid() {
        let list = HunkList::new(Vec::new()).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.total_rows(), 0);
        assert_eq!(list.joined_text(), "");
    }
}
