//! Per-file render data: segmented, tokenized and classified rows.

use crate::anchor::{HighlightRange, RangeHighlighter};
use crate::classify::classify_rows;
use crate::highlight::SyntaxTokenizer;
use crate::model::{ChangeType, FileDiff, HighlightedSpan};
use crate::segment::{build_hunks, Segmentation};

/// One rendered row of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    /// 0-based row index within the file.
    pub index: usize,
    /// Index of the diff line this row came from.
    pub line_index: usize,
    pub old_lineno: Option<u32>,
    pub new_lineno: Option<u32>,
    pub spans: Vec<HighlightedSpan>,
    /// `None` renders unstyled.
    pub change_type: Option<ChangeType>,
    /// Inside the active anchor range.
    pub highlighted: bool,
}

impl RenderedRow {
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A file prepared for display.
#[derive(Debug, Clone)]
pub struct FileRender {
    pub diff: FileDiff,
    pub segmentation: Segmentation,
    pub rows: Vec<RenderedRow>,
}

impl FileRender {
    /// Segment, tokenize and classify a file. Binary files get no rows.
    pub fn build(diff: FileDiff, tokenizer: &mut dyn SyntaxTokenizer) -> Self {
        if !diff.is_renderable() {
            return Self {
                diff,
                segmentation: Segmentation::default(),
                rows: Vec::new(),
            };
        }

        let segmentation = build_hunks(&diff.lines);
        let total = segmentation.total_rows();
        let mut tokens = if total == 0 {
            Vec::new()
        } else {
            tokenizer.tokenize(&segmentation.hunks.joined_text(), diff.display_path())
        };
        if tokens.len() != total {
            log::warn!(
                "Tokenizer returned {} rows for {} rendered rows of {}",
                tokens.len(),
                total,
                diff.display_path()
            );
        }

        // Missing token rows fall back to the row's plain text.
        let token_rows: Vec<Vec<HighlightedSpan>> = segmentation
            .hunks
            .iter()
            .flat_map(|hunk| hunk.text.iter())
            .enumerate()
            .map(|(row, text)| match tokens.get_mut(row) {
                Some(spans) => std::mem::take(spans),
                None => vec![HighlightedSpan::plain(text.as_str())],
            })
            .collect();

        let rows = classify_rows(token_rows, &segmentation.hunks)
            .into_iter()
            .map(|classified| {
                let line_index = segmentation.rows.line_for_row(classified.row).unwrap_or_default();
                let line = diff.lines.get(line_index);
                RenderedRow {
                    index: classified.row,
                    line_index,
                    old_lineno: line.and_then(|l| l.old_lineno),
                    new_lineno: line.and_then(|l| l.new_lineno),
                    spans: classified.tokens,
                    change_type: classified.change_type,
                    highlighted: false,
                }
            })
            .collect();

        Self {
            diff,
            segmentation,
            rows,
        }
    }

    pub fn path(&self) -> &str {
        self.diff.display_path()
    }

    pub fn matches_path(&self, path: &str) -> bool {
        self.diff.matches_path(path)
    }

    pub fn is_binary(&self) -> bool {
        !self.diff.is_renderable()
    }

    /// Flag rows inside the highlighter's range; returns how many were flagged.
    pub fn apply_highlight(&mut self, highlighter: &RangeHighlighter) -> usize {
        let mut flagged = 0;
        for row in &mut self.rows {
            row.highlighted = highlighter.should_highlight_row(row.old_lineno, row.new_lineno);
            if row.highlighted {
                flagged += 1;
            }
        }
        flagged
    }

    pub fn clear_highlight(&mut self) {
        for row in &mut self.rows {
            row.highlighted = false;
        }
    }

    /// Row to scroll to for `range`: the flagged row whose new line number is
    /// the range start, else the first flagged row.
    pub fn scroll_target(&self, range: HighlightRange) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.highlighted && row.new_lineno == Some(range.start()))
            .or_else(|| self.rows.iter().position(|row| row.highlighted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::PlainTokenizer;
    use crate::model::DiffLine;
    use pretty_assertions::assert_eq;

    fn sample() -> FileDiff {
        FileDiff::new("src/a.ts").with_lines(vec![
            DiffLine::metadata('F', "diff --git a/src/a.ts b/src/a.ts\n--- a/src/a.ts\n+++ b/src/a.ts"),
            DiffLine::metadata('H', "@@ -9,3 +9,4 @@"),
            DiffLine::context("a", 9, 9),
            DiffLine::removal("b", 10),
            DiffLine::addition("c", 10),
            DiffLine::addition("d", 11),
            DiffLine::context("e", 11, 12),
        ])
    }

    struct ShortTokenizer;

    impl SyntaxTokenizer for ShortTokenizer {
        fn tokenize(&mut self, _code: &str, _hint: &str) -> Vec<Vec<HighlightedSpan>> {
            vec![vec![HighlightedSpan::plain("only one")]]
        }
    }

    #[test]
    fn test_rows_inherit_line_numbers() {
        let render = FileRender::build(sample(), &mut PlainTokenizer);
        assert_eq!(render.rows.len(), 9);

        let summary: Vec<_> = render
            .rows
            .iter()
            .map(|r| (r.line_index, r.old_lineno, r.new_lineno, r.change_type))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, None, None, Some(ChangeType::Metadata)),
                (0, None, None, Some(ChangeType::Metadata)),
                (0, None, None, Some(ChangeType::Metadata)),
                (1, None, None, Some(ChangeType::Metadata)),
                (2, Some(9), Some(9), Some(ChangeType::Unchanged)),
                (3, Some(10), None, Some(ChangeType::Remove)),
                (4, None, Some(10), Some(ChangeType::Add)),
                (5, None, Some(11), Some(ChangeType::Add)),
                (6, Some(11), Some(12), Some(ChangeType::Unchanged)),
            ]
        );
        assert_eq!(render.rows[1].text(), "--- a/src/a.ts");
    }

    #[test]
    fn test_short_token_stream_falls_back_to_plain_text() {
        let render = FileRender::build(sample(), &mut ShortTokenizer);
        assert_eq!(render.rows.len(), 9);
        assert_eq!(render.rows[0].text(), "only one");
        assert_eq!(render.rows[4].text(), "a");
    }

    #[test]
    fn test_scroll_target_prefers_range_start_on_new_side() {
        let mut render = FileRender::build(sample(), &mut PlainTokenizer);
        let range = HighlightRange::new(10, 11).unwrap();
        let flagged = render.apply_highlight(&RangeHighlighter::new(Some(range)));

        // removal (old 10), both additions, trailing context (old 11)
        assert_eq!(flagged, 4);
        assert_eq!(render.scroll_target(range), Some(6));
    }

    #[test]
    fn test_scroll_target_when_both_sides_match() {
        let mut render = FileRender::build(sample(), &mut PlainTokenizer);
        let range = HighlightRange::single(11);
        render.apply_highlight(&RangeHighlighter::new(Some(range)));

        // new 11 is the second addition; old 11 is the trailing context
        assert_eq!(render.scroll_target(range), Some(7));

        let range = HighlightRange::single(9);
        render.clear_highlight();
        render.apply_highlight(&RangeHighlighter::new(Some(range)));
        assert_eq!(render.scroll_target(range), Some(4));

        let missing = HighlightRange::single(99);
        render.apply_highlight(&RangeHighlighter::new(Some(missing)));
        assert_eq!(render.scroll_target(missing), None);
    }

    #[test]
    fn test_scroll_target_falls_back_to_old_side() {
        let diff = FileDiff::new("gone.rs").with_lines(vec![
            DiffLine::context("keep", 19, 19),
            DiffLine::removal("x", 20),
            DiffLine::removal("y", 21),
        ]);
        let mut render = FileRender::build(diff, &mut PlainTokenizer);
        let range = HighlightRange::new(20, 21).unwrap();
        assert_eq!(render.apply_highlight(&RangeHighlighter::new(Some(range))), 2);
        assert_eq!(render.scroll_target(range), Some(1));
    }

    #[test]
    fn test_binary_file_has_no_rows() {
        let mut diff = FileDiff::new("logo.png");
        diff.binary = true;
        let render = FileRender::build(diff, &mut PlainTokenizer);
        assert!(render.is_binary());
        assert!(render.rows.is_empty());
    }
}
