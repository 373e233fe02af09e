//! Hunk builder: groups a file's diff lines into contiguous same-type hunks.
//!
//! A diff line whose content embeds `\n` expands into several rendered rows.
//! The builder tracks that expansion so row indices stay aligned with the
//! flattened text the syntax highlighter sees.

use crate::model::{DiffLine, Hunk, HunkList};
use std::collections::BTreeMap;
use std::ops::Range;

/// Result of segmenting one file's line sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    /// Contiguous hunks covering every rendered row.
    pub hunks: HunkList,
    /// Original line index -> number of extra rows that line expanded into.
    /// Only lines with embedded newlines appear.
    pub idx_unexpected_line_count: BTreeMap<usize, usize>,
    /// Mapping between original lines and rendered rows.
    pub rows: RowIndexMap,
}

impl Segmentation {
    /// Total rendered rows.
    pub fn total_rows(&self) -> usize {
        self.rows.total_rows()
    }
}

/// One-to-many relation from original line index to rendered rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIndexMap {
    /// `starts[i]` is the first row of line `i`; the last entry is the row total.
    starts: Vec<usize>,
}

impl Default for RowIndexMap {
    fn default() -> Self {
        Self { starts: vec![0] }
    }
}

impl RowIndexMap {
    /// Number of original lines.
    pub fn line_count(&self) -> usize {
        self.starts.len() - 1
    }

    /// Number of rendered rows.
    pub fn total_rows(&self) -> usize {
        self.starts.last().copied().unwrap_or(0)
    }

    /// Rendered rows occupied by an original line.
    pub fn rows_for_line(&self, line: usize) -> Option<Range<usize>> {
        let start = *self.starts.get(line)?;
        let end = *self.starts.get(line + 1)?;
        Some(start..end)
    }

    /// Original line a rendered row belongs to.
    pub fn line_for_row(&self, row: usize) -> Option<usize> {
        if row >= self.total_rows() {
            return None;
        }
        // First start strictly greater than `row`, minus one.
        Some(self.starts.partition_point(|&start| start <= row) - 1)
    }
}

/// Group diff lines into hunks.
///
/// Consecutive lines with the same change type share a hunk; every part of a
/// line's content (split on `\n`) becomes one row of text in its hunk.
pub fn build_hunks(lines: &[DiffLine]) -> Segmentation {
    let mut hunks: Vec<Hunk> = Vec::new();
    let mut idx_unexpected_line_count = BTreeMap::new();
    let mut starts = Vec::with_capacity(lines.len() + 1);
    // Rows injected by multi-row lines seen so far.
    let mut added_lines = 0usize;

    for (i, line) in lines.iter().enumerate() {
        let change_type = line.change_type();
        let parts: Vec<String> = line.content.split('\n').map(str::to_string).collect();
        let extra_lines_count = parts.len() - 1;
        if extra_lines_count > 0 {
            idx_unexpected_line_count.insert(i, extra_lines_count);
        }

        let row = i + added_lines;
        starts.push(row);

        let continues_open = hunks.last().is_some_and(|h| h.change_type == change_type);
        if continues_open {
            if let Some(open) = hunks.last_mut() {
                open.text.extend(parts);
            }
        } else {
            if let Some(open) = hunks.last_mut() {
                open.end_line = row;
            }
            hunks.push(Hunk {
                text: parts,
                start_line: row,
                end_line: row,
                change_type,
            });
        }
        added_lines += extra_lines_count;
    }

    let total_rows = lines.len() + added_lines;
    if let Some(open) = hunks.last_mut() {
        open.end_line = total_rows;
    }
    starts.push(total_rows);

    let checked = HunkList::new(hunks);
    debug_assert!(
        checked.is_ok(),
        "hunk builder broke ordering: {:?}",
        checked.as_ref().err()
    );
    let hunks = checked.unwrap_or_else(|err| {
        log::error!("Hunk builder produced an invalid hunk list: {}", err);
        HunkList::default()
    });

    Segmentation {
        hunks,
        idx_unexpected_line_count,
        rows: RowIndexMap { starts },
    }
}
