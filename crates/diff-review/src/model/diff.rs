//! Diff data structures describing the changes between two revisions.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The full set of per-file diffs between two revisions.
///
/// Produced once per (source, target, pattern) query and treated as
/// immutable after receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDiff {
    /// Every file touched between the two revisions.
    pub files: Vec<FileDiff>,
}

impl TreeDiff {
    /// Create a tree diff from a list of files.
    pub fn new(files: Vec<FileDiff>) -> Self {
        Self { files }
    }

    /// True when the revisions have no differences.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of changed files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Total added lines across all files.
    pub fn total_additions(&self) -> usize {
        self.files.iter().map(FileDiff::additions).sum()
    }

    /// Total removed lines across all files.
    pub fn total_deletions(&self) -> usize {
        self.files.iter().map(FileDiff::deletions).sum()
    }
}

/// A single file's diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    /// Path before the change.
    pub old_file: String,
    /// Path after the change.
    pub new_file: String,
    /// What happened to the file.
    pub status: FileStatus,
    /// Binary files carry no renderable lines.
    pub binary: bool,
    /// Line-level diff, in display order.
    pub lines: Vec<DiffLine>,
}

impl FileDiff {
    /// Create a modified, non-binary file diff where old and new paths match.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            old_file: path.clone(),
            new_file: path,
            status: FileStatus::Modified,
            binary: false,
            lines: Vec::new(),
        }
    }

    /// Set the status.
    pub fn with_status(mut self, status: FileStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the lines.
    pub fn with_lines(mut self, lines: Vec<DiffLine>) -> Self {
        self.lines = lines;
        self
    }

    /// The path shown to the reviewer: deleted files only exist on the old side.
    pub fn display_path(&self) -> &str {
        if self.status == FileStatus::Deleted {
            &self.old_file
        } else {
            &self.new_file
        }
    }

    /// Whether a repository-relative path names this file on either side.
    pub fn matches_path(&self, path: &str) -> bool {
        let path = path.trim_start_matches('/');
        !path.is_empty() && (self.new_file == path || self.old_file == path)
    }

    /// Whether the line sequence is rendered at all.
    pub fn is_renderable(&self) -> bool {
        !self.binary
    }

    /// Number of added lines.
    pub fn additions(&self) -> usize {
        self.lines.iter().filter(|l| l.origin == '+').count()
    }

    /// Number of removed lines.
    pub fn deletions(&self) -> usize {
        self.lines.iter().filter(|l| l.origin == '-').count()
    }
}

/// File status in the diff, serialized as git's single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "char", into = "char")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    /// Any other git delta code (typechange, unreadable, ...).
    Other(char),
}

impl FileStatus {
    /// Get a single-character representation.
    pub fn as_char(&self) -> char {
        match self {
            FileStatus::Added => 'A',
            FileStatus::Modified => 'M',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
            FileStatus::Copied => 'C',
            FileStatus::Other(c) => *c,
        }
    }

    /// Human readable label for file headers.
    pub fn label(&self) -> String {
        match self {
            FileStatus::Added => "Added".to_string(),
            FileStatus::Modified => "Modified".to_string(),
            FileStatus::Deleted => "Deleted".to_string(),
            FileStatus::Renamed => "Renamed".to_string(),
            FileStatus::Copied => "Copied".to_string(),
            FileStatus::Other(c) => c.to_string(),
        }
    }

    /// Get the status color.
    pub fn color(&self) -> Color {
        match self {
            FileStatus::Added => Color::Green,
            FileStatus::Modified => Color::Yellow,
            FileStatus::Deleted => Color::Red,
            FileStatus::Renamed | FileStatus::Copied => Color::Cyan,
            FileStatus::Other(_) => Color::Gray,
        }
    }
}

impl From<char> for FileStatus {
    fn from(c: char) -> Self {
        match c {
            'A' => FileStatus::Added,
            'M' => FileStatus::Modified,
            'D' => FileStatus::Deleted,
            'R' => FileStatus::Renamed,
            'C' => FileStatus::Copied,
            other => FileStatus::Other(other),
        }
    }
}

impl From<FileStatus> for char {
    fn from(status: FileStatus) -> Self {
        status.as_char()
    }
}

/// A single line in a file diff.
///
/// `content` may embed `\n` (file headers do), in which case the line
/// occupies more than one rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    /// Line number in the old file (context and removals).
    pub old_lineno: Option<u32>,
    /// Line number in the new file (context and additions).
    pub new_lineno: Option<u32>,
    /// Line content without the origin marker.
    pub content: String,
    /// Origin marker: `+`, `-`, ` ` or a metadata code.
    pub origin: char,
}

impl DiffLine {
    /// Create a new context line.
    pub fn context(content: impl Into<String>, old_lineno: u32, new_lineno: u32) -> Self {
        Self {
            old_lineno: Some(old_lineno),
            new_lineno: Some(new_lineno),
            content: content.into(),
            origin: ' ',
        }
    }

    /// Create a new addition line.
    pub fn addition(content: impl Into<String>, new_lineno: u32) -> Self {
        Self {
            old_lineno: None,
            new_lineno: Some(new_lineno),
            content: content.into(),
            origin: '+',
        }
    }

    /// Create a new removal line.
    pub fn removal(content: impl Into<String>, old_lineno: u32) -> Self {
        Self {
            old_lineno: Some(old_lineno),
            new_lineno: None,
            content: content.into(),
            origin: '-',
        }
    }

    /// Create a metadata line (file header, hunk header, ...).
    pub fn metadata(origin: char, content: impl Into<String>) -> Self {
        Self {
            old_lineno: None,
            new_lineno: None,
            content: content.into(),
            origin,
        }
    }

    /// Change type derived from the origin marker.
    pub fn change_type(&self) -> ChangeType {
        ChangeType::from_origin(self.origin)
    }

    /// Number of rendered rows this line occupies.
    pub fn row_count(&self) -> usize {
        self.content.matches('\n').count() + 1
    }
}

/// Change classification shared by every row of a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Add,
    Remove,
    Unchanged,
    Metadata,
}

impl ChangeType {
    /// Classify an origin marker. Anything other than `+`, `-` or ` ` is metadata.
    pub fn from_origin(origin: char) -> Self {
        match origin {
            '+' => ChangeType::Add,
            '-' => ChangeType::Remove,
            ' ' => ChangeType::Unchanged,
            _ => ChangeType::Metadata,
        }
    }

    /// Prefix shown in the gutter.
    pub fn prefix(&self) -> char {
        match self {
            ChangeType::Add => '+',
            ChangeType::Remove => '-',
            ChangeType::Unchanged | ChangeType::Metadata => ' ',
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeType::Add => "add",
            ChangeType::Remove => "remove",
            ChangeType::Unchanged => "unchanged",
            ChangeType::Metadata => "metadata",
        };
        f.write_str(name)
    }
}

/// A syntax-highlighted span of text.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedSpan {
    /// The text content.
    pub text: String,
    /// Foreground color.
    pub fg: Option<Color>,
    /// Background color (usually None, row background takes precedence).
    pub bg: Option<Color>,
    /// Bold style.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
    /// Underline style.
    pub underline: bool,
}

impl HighlightedSpan {
    /// Create a plain span with no styling.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fg: None,
            bg: None,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_path_for_deleted_file() {
        let mut file = FileDiff::new("src/new.rs").with_status(FileStatus::Deleted);
        file.old_file = "src/old.rs".to_string();
        assert_eq!(file.display_path(), "src/old.rs");

        let file = FileDiff::new("src/new.rs").with_status(FileStatus::Added);
        assert_eq!(file.display_path(), "src/new.rs");
    }

    #[test]
    fn test_matches_path_on_either_side() {
        let mut file = FileDiff::new("src/b.rs").with_status(FileStatus::Renamed);
        file.old_file = "src/a.rs".to_string();

        assert!(file.matches_path("src/a.rs"));
        assert!(file.matches_path("src/b.rs"));
        assert!(file.matches_path("/src/b.rs"));
        assert!(!file.matches_path("src/c.rs"));
        assert!(!file.matches_path(""));
    }

    #[test]
    fn test_change_type_from_origin() {
        assert_eq!(ChangeType::from_origin('+'), ChangeType::Add);
        assert_eq!(ChangeType::from_origin('-'), ChangeType::Remove);
        assert_eq!(ChangeType::from_origin(' '), ChangeType::Unchanged);
        assert_eq!(ChangeType::from_origin('F'), ChangeType::Metadata);
        assert_eq!(ChangeType::from_origin('H'), ChangeType::Metadata);
        assert_eq!(ChangeType::from_origin('\\'), ChangeType::Metadata);
    }

    #[test]
    fn test_row_count_counts_embedded_newlines() {
        assert_eq!(DiffLine::addition("x", 1).row_count(), 1);
        assert_eq!(DiffLine::metadata('F', "a\nb\nc").row_count(), 3);
        assert_eq!(DiffLine::metadata('F', "a\n").row_count(), 2);
    }

    #[test]
    fn test_tree_diff_json_shape() {
        let json = r#"{
            "files": [{
                "old_file": "src/a.ts",
                "new_file": "src/a.ts",
                "status": "M",
                "binary": false,
                "lines": [
                    {"old_lineno": null, "new_lineno": 7, "content": "let x = 1;", "origin": "+"}
                ]
            }]
        }"#;

        let diff: TreeDiff = serde_json::from_str(json).unwrap();
        assert_eq!(diff.file_count(), 1);
        assert_eq!(diff.files[0].status, FileStatus::Modified);
        assert_eq!(diff.files[0].lines[0], DiffLine::addition("let x = 1;", 7));
        assert_eq!(diff.total_additions(), 1);
        assert_eq!(diff.total_deletions(), 0);

        let back = serde_json::to_value(&diff).unwrap();
        assert_eq!(back["files"][0]["status"], "M");
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        assert_eq!(FileStatus::from('T'), FileStatus::Other('T'));
        assert_eq!(FileStatus::Other('T').as_char(), 'T');
        assert_eq!(FileStatus::Other('T').label(), "T");
        assert_eq!(FileStatus::Added.label(), "Added");
    }
}
