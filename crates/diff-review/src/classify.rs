//! Row classifier: maps a rendered row back to the hunk that owns it.
//!
//! The syntax highlighter returns one token row per rendered row and nothing
//! else, so this lookup is what puts the change type back on each row.

use crate::model::{ChangeType, Hunk, HunkList};
use std::cmp::Ordering;

impl HunkList {
    /// Find the hunk whose `[start_line, end_line)` contains `row`.
    ///
    /// Rows past the end yield `None`; callers render those unstyled.
    pub fn find_by_row(&self, row: usize) -> Option<&Hunk> {
        let hunks = self.as_slice();
        hunks
            .binary_search_by(|hunk| {
                if row < hunk.start_line {
                    Ordering::Greater
                } else if row >= hunk.end_line {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
            .ok()
            .map(|idx| &hunks[idx])
    }

    /// Change type of a rendered row, if the row exists.
    pub fn change_type_of(&self, row: usize) -> Option<ChangeType> {
        self.find_by_row(row).map(|hunk| hunk.change_type)
    }
}

/// Signed lookup: negative rows never match.
pub fn find_hunk_by_line(line_number: i64, hunks: &HunkList) -> Option<&Hunk> {
    let row = usize::try_from(line_number).ok()?;
    hunks.find_by_row(row)
}

/// A tokenized row tagged with the change type of its hunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow<T> {
    /// 0-based rendered row index.
    pub row: usize,
    /// Whatever the tokenizer produced for this row.
    pub tokens: T,
    /// `None` when the row lies outside every hunk.
    pub change_type: Option<ChangeType>,
}

/// Re-attach change types to a token stream, assuming the tokenizer kept
/// row order.
pub fn classify_rows<T, I>(token_rows: I, hunks: &HunkList) -> Vec<ClassifiedRow<T>>
where
    I: IntoIterator<Item = T>,
{
    token_rows
        .into_iter()
        .enumerate()
        .map(|(row, tokens)| ClassifiedRow {
            row,
            tokens,
            change_type: hunks.change_type_of(row),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DiffLine;
    use crate::segment::build_hunks;
    use pretty_assertions::assert_eq;

    fn sample() -> HunkList {
        build_hunks(&[
            DiffLine::metadata('F', "diff --git a/x b/x\n--- a/x\n+++ b/x"),
            DiffLine::metadata('H', "@@ -1,3 +1,3 @@"),
            DiffLine::context("a", 1, 1),
            DiffLine::removal("b", 2),
            DiffLine::addition("c", 2),
            DiffLine::addition("d\ne", 3),
            DiffLine::context("f", 3, 5),
        ])
        .hunks
    }

    #[test]
    fn test_every_row_has_exactly_one_owner() {
        let hunks = sample();
        let total = hunks.total_rows();
        assert_eq!(total, 10);

        for row in 0..total {
            let found = hunks.find_by_row(row).unwrap();
            assert!(found.contains(row));
            let owners = hunks.iter().filter(|h| h.contains(row)).count();
            assert_eq!(owners, 1);
        }
    }

    #[test]
    fn test_out_of_range_rows() {
        let hunks = sample();
        assert!(hunks.find_by_row(hunks.total_rows()).is_none());
        assert!(hunks.find_by_row(usize::MAX).is_none());
        assert!(find_hunk_by_line(-1, &hunks).is_none());
        assert!(find_hunk_by_line(10, &hunks).is_none());
        assert!(find_hunk_by_line(9, &hunks).is_some());
        assert!(HunkList::default().find_by_row(0).is_none());
    }

    #[test]
    fn test_rows_of_expanded_lines_keep_their_type() {
        let hunks = sample();
        let types: Vec<_> = (0..10).map(|r| hunks.change_type_of(r)).collect();
        assert_eq!(
            types,
            vec![
                Some(ChangeType::Metadata),
                Some(ChangeType::Metadata),
                Some(ChangeType::Metadata),
                Some(ChangeType::Metadata),
                Some(ChangeType::Unchanged),
                Some(ChangeType::Remove),
                Some(ChangeType::Add),
                Some(ChangeType::Add),
                Some(ChangeType::Add),
                Some(ChangeType::Unchanged),
            ]
        );
    }

    #[test]
    fn test_classify_rows_tags_tokens() {
        let hunks = build_hunks(&[
            DiffLine::addition("a", 1),
            DiffLine::addition("b", 2),
            DiffLine::context("c", 1, 3),
        ])
        .hunks;

        let rows = classify_rows(vec!["A", "B", "C", "extra"], &hunks);
        let tagged: Vec<_> = rows.iter().map(|r| (r.row, r.tokens, r.change_type)).collect();
        assert_eq!(
            tagged,
            vec![
                (0, "A", Some(ChangeType::Add)),
                (1, "B", Some(ChangeType::Add)),
                (2, "C", Some(ChangeType::Unchanged)),
                (3, "extra", None),
            ]
        );
    }
}
