//! Parse `git diff` output into a [`TreeDiff`].
//!
//! Lines are emitted with git's origin vocabulary: one `'F'` line carrying
//! the whole file header, one `'H'` line per hunk header, then `+`, `-`,
//! ` ` and `\` lines.

use crate::model::{DiffLine, FileDiff, FileStatus, TreeDiff};
use thiserror::Error;
use unidiff::{Hunk as UnidiffHunk, Line as UnidiffLine, PatchSet};

const DIFF_HEADER: &str = "diff --git ";
const DEV_NULL: &str = "/dev/null";

/// Errors that can occur during diff parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to parse hunks of {path}: {message}")]
    Hunks { path: String, message: String },
    #[error("Malformed diff header: {0:?}")]
    Header(String),
}

/// Parse unified diff text, as printed by `git diff`, into a tree diff.
///
/// Empty input is a valid, empty diff.
pub fn parse_unified_diff(diff_text: &str) -> Result<TreeDiff, ParseError> {
    let files = split_files(diff_text)
        .into_iter()
        .map(parse_file)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TreeDiff::new(files))
}

/// Split on `diff --git` boundaries. Text without any such header is
/// treated as a single plain unified diff.
fn split_files(diff_text: &str) -> Vec<&str> {
    let mut starts: Vec<usize> = Vec::new();
    let mut offset = 0;
    for line in diff_text.split_inclusive('\n') {
        if line.starts_with(DIFF_HEADER) {
            starts.push(offset);
        }
        offset += line.len();
    }

    if starts.is_empty() {
        return if diff_text.trim().is_empty() {
            Vec::new()
        } else {
            vec![diff_text]
        };
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(diff_text.len());
            &diff_text[start..end]
        })
        .collect()
}

#[derive(Debug, Default)]
struct FileHeader {
    lines: Vec<String>,
    old_file: Option<String>,
    new_file: Option<String>,
    status: Option<FileStatus>,
    binary: bool,
}

fn parse_header(chunk: &str) -> Result<FileHeader, ParseError> {
    let mut header = FileHeader::default();

    for line in chunk.lines().take_while(|l| !l.starts_with("@@")) {
        header.lines.push(line.to_string());

        if let Some(rest) = line.strip_prefix(DIFF_HEADER) {
            let (old, new) = split_git_paths(rest).ok_or_else(|| ParseError::Header(line.to_string()))?;
            header.old_file.get_or_insert(old);
            header.new_file.get_or_insert(new);
        } else if line.starts_with("new file mode") {
            header.status = Some(FileStatus::Added);
        } else if line.starts_with("deleted file mode") {
            header.status = Some(FileStatus::Deleted);
        } else if let Some(path) = line.strip_prefix("rename from ") {
            header.status = Some(FileStatus::Renamed);
            header.old_file = Some(path.to_string());
        } else if let Some(path) = line.strip_prefix("rename to ") {
            header.new_file = Some(path.to_string());
        } else if let Some(path) = line.strip_prefix("copy from ") {
            header.status = Some(FileStatus::Copied);
            header.old_file = Some(path.to_string());
        } else if let Some(path) = line.strip_prefix("copy to ") {
            header.new_file = Some(path.to_string());
        } else if let Some(path) = line.strip_prefix("--- ") {
            if path != DEV_NULL {
                header.old_file = Some(clean_path(path));
            }
        } else if let Some(path) = line.strip_prefix("+++ ") {
            if path != DEV_NULL {
                header.new_file = Some(clean_path(path));
            }
        } else if line == "GIT binary patch"
            || (line.starts_with("Binary files ") && line.ends_with(" differ"))
        {
            header.binary = true;
        }
    }

    Ok(header)
}

/// Split `a/<old> b/<new>` from a `diff --git` line.
///
/// When both sides name the same path (everything but renames and copies),
/// the line splits at its midpoint, which stays right for paths that
/// themselves contain ` b/`.
fn split_git_paths(rest: &str) -> Option<(String, String)> {
    let rest = rest.trim_end();
    if let Some(path) = same_path(rest) {
        return Some((path.to_string(), path.to_string()));
    }
    let idx = rest.rfind(" b/")?;
    let old = rest[..idx].strip_prefix("a/")?;
    let new = &rest[idx + 3..];
    Some((old.to_string(), new.to_string()))
}

fn same_path(rest: &str) -> Option<&str> {
    if rest.len() % 2 == 0 {
        return None;
    }
    let mid = rest.len() / 2;
    let (old, new) = (rest.get(..mid)?, rest.get(mid..)?);
    let old = old.strip_prefix("a/")?;
    let new = new.strip_prefix(" b/")?;
    (old == new).then_some(old)
}

fn parse_file(chunk: &str) -> Result<FileDiff, ParseError> {
    let header = parse_header(chunk)?;

    let new_file = header
        .new_file
        .clone()
        .or_else(|| header.old_file.clone())
        .ok_or_else(|| ParseError::Header(header.lines.first().cloned().unwrap_or_default()))?;
    let old_file = header.old_file.clone().unwrap_or_else(|| new_file.clone());

    let mut file = FileDiff::new(new_file.as_str()).with_status(header.status.unwrap_or(FileStatus::Modified));
    file.old_file = old_file;
    file.binary = header.binary;
    if file.binary {
        return Ok(file);
    }

    let mut lines = Vec::new();
    if !header.lines.is_empty() {
        lines.push(DiffLine::metadata('F', header.lines.join("\n")));
    }

    if chunk.contains("\n@@") || chunk.starts_with("@@") {
        let mut patch_set = PatchSet::new();
        patch_set.parse(chunk).map_err(|e| ParseError::Hunks {
            path: new_file.clone(),
            message: e.to_string(),
        })?;
        for patched in patch_set.files() {
            for hunk in patched.hunks() {
                push_hunk(&mut lines, hunk);
            }
        }
    }

    Ok(file.with_lines(lines))
}

fn push_hunk(lines: &mut Vec<DiffLine>, hunk: &UnidiffHunk) {
    let mut header = format!(
        "@@ -{},{} +{},{} @@",
        hunk.source_start, hunk.source_length, hunk.target_start, hunk.target_length
    );
    if !hunk.section_header.is_empty() {
        header.push(' ');
        header.push_str(hunk.section_header.trim());
    }
    lines.push(DiffLine::metadata('H', header));
    lines.extend(hunk.lines().iter().map(convert_line));
}

fn convert_line(line: &UnidiffLine) -> DiffLine {
    let content = line.value.strip_suffix('\n').unwrap_or(&line.value).to_string();
    let old_lineno = line.source_line_no.map(|n| n as u32);
    let new_lineno = line.target_line_no.map(|n| n as u32);

    match line.line_type.as_str() {
        "+" => DiffLine {
            old_lineno: None,
            new_lineno,
            content,
            origin: '+',
        },
        "-" => DiffLine {
            old_lineno,
            new_lineno: None,
            content,
            origin: '-',
        },
        " " => DiffLine {
            old_lineno,
            new_lineno,
            content,
            origin: ' ',
        },
        _ => DiffLine::metadata('\\', "\\ No newline at end of file"),
    }
}

/// Remove the `a/` / `b/` prefixes git puts on header paths.
fn clean_path(path: &str) -> String {
    let path = path.trim();
    path.strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeType;
    use pretty_assertions::assert_eq;

    const SAMPLE_DIFF: &str = r#"diff --git a/src/main.rs b/src/main.rs
index abc123..def456 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,3 +1,4 @@ fn main()
 fn main() {
     println!("Hello");
+    println!("World");
 }
diff --git a/src/lib.rs b/src/lib.rs
index 111222..333444 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -10,4 +10,3 @@ impl Foo {
 impl Foo {
-    // old comment
     fn bar(&self) {}
 }
"#;

    #[test]
    fn test_parse_two_files() {
        let diff = parse_unified_diff(SAMPLE_DIFF).unwrap();

        assert_eq!(diff.file_count(), 2);
        assert_eq!(diff.total_additions(), 1);
        assert_eq!(diff.total_deletions(), 1);

        let main = &diff.files[0];
        assert_eq!(main.new_file, "src/main.rs");
        assert_eq!(main.old_file, "src/main.rs");
        assert_eq!(main.status, FileStatus::Modified);

        let origins: String = main.lines.iter().map(|l| l.origin).collect();
        assert_eq!(origins, "FH  + ");
        assert_eq!(
            main.lines[0].content,
            "diff --git a/src/main.rs b/src/main.rs\nindex abc123..def456 100644\n--- a/src/main.rs\n+++ b/src/main.rs"
        );
        assert_eq!(main.lines[1].content, "@@ -1,3 +1,4 @@ fn main()");
    }

    #[test]
    fn test_line_numbers() {
        let diff = parse_unified_diff(SAMPLE_DIFF).unwrap();
        let lines = &diff.files[0].lines;

        assert_eq!((lines[2].old_lineno, lines[2].new_lineno), (Some(1), Some(1)));
        assert_eq!((lines[4].old_lineno, lines[4].new_lineno), (None, Some(3)));
        assert_eq!(lines[4].content, "    println!(\"World\");");
        assert_eq!((lines[5].old_lineno, lines[5].new_lineno), (Some(3), Some(4)));

        let removal = &diff.files[1].lines[3];
        assert_eq!(removal.change_type(), ChangeType::Remove);
        assert_eq!((removal.old_lineno, removal.new_lineno), (Some(11), None));
    }

    #[test]
    fn test_header_is_the_multi_row_line() {
        let diff = parse_unified_diff(SAMPLE_DIFF).unwrap();
        let header = &diff.files[1].lines[0];
        assert_eq!(header.change_type(), ChangeType::Metadata);
        assert_eq!(header.row_count(), 4);
    }

    #[test]
    fn test_parse_new_file() {
        let diff = r#"diff --git a/new_file.rs b/new_file.rs
new file mode 100644
index 0000000..abc1234
--- /dev/null
+++ b/new_file.rs
@@ -0,0 +1,3 @@
+fn new_function() {
+    // new code
+}
"#;

        let parsed = parse_unified_diff(diff).unwrap();
        let file = &parsed.files[0];
        assert_eq!(file.status, FileStatus::Added);
        assert_eq!(file.new_file, "new_file.rs");
        assert_eq!(file.additions(), 3);
    }

    #[test]
    fn test_parse_deleted_file() {
        let diff = r#"diff --git a/old_file.rs b/old_file.rs
deleted file mode 100644
index abc1234..0000000
--- a/old_file.rs
+++ /dev/null
@@ -1,2 +0,0 @@
-fn old_function() {
-}
"#;

        let parsed = parse_unified_diff(diff).unwrap();
        let file = &parsed.files[0];
        assert_eq!(file.status, FileStatus::Deleted);
        assert_eq!(file.display_path(), "old_file.rs");
        assert_eq!(file.deletions(), 2);
    }

    #[test]
    fn test_parse_renamed_file() {
        let diff = r#"diff --git a/old_name.rs b/new_name.rs
similarity index 95%
rename from old_name.rs
rename to new_name.rs
index abc123..def456 100644
--- a/old_name.rs
+++ b/new_name.rs
@@ -1,3 +1,3 @@
 fn example() {
-    // old
+    // new
 }
"#;

        let parsed = parse_unified_diff(diff).unwrap();
        let file = &parsed.files[0];
        assert_eq!(file.status, FileStatus::Renamed);
        assert_eq!(file.old_file, "old_name.rs");
        assert_eq!(file.new_file, "new_name.rs");
        assert!(file.matches_path("/old_name.rs"));
    }

    #[test]
    fn test_binary_and_mode_only_files() {
        let diff = "diff --git a/logo.png b/logo.png\nindex 1111111..2222222 100644\nBinary files a/logo.png and b/logo.png differ\ndiff --git a/run.sh b/run.sh\nold mode 100644\nnew mode 100755\n";

        let parsed = parse_unified_diff(diff).unwrap();
        assert_eq!(parsed.file_count(), 2);

        assert!(parsed.files[0].binary);
        assert!(parsed.files[0].lines.is_empty());
        assert!(!parsed.files[0].is_renderable());

        let mode_only = &parsed.files[1];
        assert!(!mode_only.binary);
        assert_eq!(mode_only.new_file, "run.sh");
        assert_eq!(mode_only.lines.len(), 1);
        assert_eq!(mode_only.lines[0].origin, 'F');
    }

    #[test]
    fn test_mode_only_path_containing_b_slash() {
        let diff = "diff --git a/docs/a b/c.sh b/docs/a b/c.sh\nold mode 100644\nnew mode 100755\n";
        let parsed = parse_unified_diff(diff).unwrap();
        assert_eq!(parsed.files[0].new_file, "docs/a b/c.sh");
        assert_eq!(parsed.files[0].old_file, "docs/a b/c.sh");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_unified_diff("").unwrap().is_empty());
        assert!(parse_unified_diff("\n").unwrap().is_empty());
    }

    #[test]
    fn test_split_git_paths() {
        assert_eq!(
            split_git_paths("a/src/my file.rs b/src/my file.rs"),
            Some(("src/my file.rs".to_string(), "src/my file.rs".to_string()))
        );
        assert_eq!(
            split_git_paths("a/docs/a b/c.md b/docs/a b/c.md"),
            Some(("docs/a b/c.md".to_string(), "docs/a b/c.md".to_string()))
        );
        assert_eq!(
            split_git_paths("a/old.rs b/new.rs"),
            Some(("old.rs".to_string(), "new.rs".to_string()))
        );
        assert_eq!(split_git_paths("garbage"), None);
        assert_eq!(clean_path("b/src/main.rs"), "src/main.rs");
    }
}
