//! Diff provider backed by the `git` command line.

use super::{CommitLookup, CommitMetadata, DiffProvider, DiffRequest, ProviderError};
use crate::model::TreeDiff;
use crate::parser::parse_unified_diff;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use std::path::PathBuf;

/// Field separator for `git show --format`.
const FIELD_SEP: char = '\u{1f}';
const SHOW_FORMAT: &str = "--format=%H%x1f%an%x1f%ae%x1f%at%x1f%B";

/// Runs `git` inside a repository checkout.
#[derive(Debug, Clone)]
pub struct GitCli {
    pub repo: PathBuf,
    /// Lines of context around each change (`git diff -U<n>`).
    pub context_lines: u32,
}

impl GitCli {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            context_lines: 3,
        }
    }

    pub fn with_context_lines(mut self, context_lines: u32) -> Self {
        self.context_lines = context_lines;
        self
    }

    fn diff_args(&self, request: &DiffRequest) -> Vec<String> {
        let mut args = vec![
            "diff".to_string(),
            "--no-color".to_string(),
            "--no-ext-diff".to_string(),
            format!("-U{}", self.context_lines),
            request.from_revision().to_string(),
            request.to_revision().to_string(),
        ];
        if let Some(pattern) = request.pattern() {
            args.push("--".to_string());
            args.push(pattern.to_string());
        }
        args
    }

    async fn run(&self, args: &[String], revisions: &[&str]) -> Result<String, ProviderError> {
        debug!("Running git {:?} in {}", args, self.repo.display());
        let output = tokio::process::Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(classify_failure(output.status.code().unwrap_or(-1), stderr, revisions));
        }
        Ok(String::from_utf8(output.stdout)?)
    }
}

#[async_trait]
impl DiffProvider for GitCli {
    async fn tree_diff(&self, request: &DiffRequest) -> Result<TreeDiff, ProviderError> {
        let args = self.diff_args(request);
        let text = self
            .run(&args, &[request.from_revision(), request.to_revision()])
            .await?;
        let diff = parse_unified_diff(&text)?;
        debug!(
            "git diff {}..{} produced {} files",
            request.from_revision(),
            request.to_revision(),
            diff.file_count()
        );
        Ok(diff)
    }
}

#[async_trait]
impl CommitLookup for GitCli {
    async fn commit_metadata(&self, revision: &str) -> Result<CommitMetadata, ProviderError> {
        let args = vec![
            "show".to_string(),
            "-s".to_string(),
            SHOW_FORMAT.to_string(),
            revision.to_string(),
        ];
        let text = self.run(&args, &[revision]).await?;
        parse_show_output(&text).ok_or_else(|| ProviderError::RevisionNotFound(revision.to_string()))
    }
}

/// Map a failed git invocation to an error, recognizing unknown revisions.
fn classify_failure(status: i32, stderr: String, revisions: &[&str]) -> ProviderError {
    let unknown = stderr.contains("unknown revision")
        || stderr.contains("bad revision")
        || stderr.contains("bad object");
    if unknown {
        let revision = revisions
            .iter()
            .find(|rev| stderr.contains(*rev))
            .or(revisions.first())
            .map(|rev| rev.to_string())
            .unwrap_or_default();
        return ProviderError::RevisionNotFound(revision);
    }
    ProviderError::Git { status, stderr }
}

fn parse_show_output(text: &str) -> Option<CommitMetadata> {
    let mut fields = text.splitn(5, FIELD_SEP);
    let commit_id = fields.next()?.trim().to_string();
    let author_name = fields.next()?.to_string();
    let author_email = fields.next()?.to_string();
    let timestamp: i64 = fields.next()?.trim().parse().ok()?;
    let message = fields.next()?.trim_end().to_string();

    if commit_id.is_empty() {
        return None;
    }

    let author_time: DateTime<Utc> = DateTime::from_timestamp(timestamp, 0)?;
    let summary = message.lines().next().unwrap_or_default().to_string();

    Some(CommitMetadata {
        commit_id,
        summary,
        message,
        author_name,
        author_email,
        author_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diff_args() {
        let git = GitCli::new(".").with_context_lines(5);

        let tree = DiffRequest::Tree {
            from: "main".to_string(),
            to: "HEAD".to_string(),
        };
        assert_eq!(
            git.diff_args(&tree),
            vec!["diff", "--no-color", "--no-ext-diff", "-U5", "main", "HEAD"]
        );

        let file = DiffRequest::File {
            from: "main".to_string(),
            to: "HEAD".to_string(),
            pattern: "src/a.ts".to_string(),
        };
        let args = git.diff_args(&file);
        assert_eq!(args[args.len() - 2..].to_vec(), vec!["--", "src/a.ts"]);
    }

    #[test]
    fn test_classify_failure() {
        let err = classify_failure(
            128,
            "fatal: ambiguous argument 'nope': unknown revision or path not in the working tree."
                .to_string(),
            &["main", "nope"],
        );
        assert!(matches!(err, ProviderError::RevisionNotFound(rev) if rev == "nope"));

        let err = classify_failure(1, "fatal: something else".to_string(), &["main"]);
        assert!(matches!(err, ProviderError::Git { status: 1, .. }));
    }

    #[test]
    fn test_parse_show_output() {
        let text = "abc123\u{1f}Jane Doe\u{1f}jane@example.com\u{1f}1700000000\u{1f}Fix the thing\n\nLonger body.\n";
        let meta = parse_show_output(text).unwrap();

        assert_eq!(meta.commit_id, "abc123");
        assert_eq!(meta.author_name, "Jane Doe");
        assert_eq!(meta.author_email, "jane@example.com");
        assert_eq!(meta.summary, "Fix the thing");
        assert_eq!(meta.message, "Fix the thing\n\nLonger body.");
        assert_eq!(meta.author_time.timestamp(), 1_700_000_000);

        assert_eq!(parse_show_output("garbage"), None);
    }

    #[tokio::test]
    async fn test_missing_repository_is_an_io_error() {
        let git = GitCli::new("/definitely/not/a/repository");
        let request = DiffRequest::Tree {
            from: "a".to_string(),
            to: "b".to_string(),
        };
        let err = git.tree_diff(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::Io(_)));
    }
}
