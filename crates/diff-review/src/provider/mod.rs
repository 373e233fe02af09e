//! Diff and commit-metadata collaborators.
//!
//! The view never talks to git directly: it hands out a [`DiffRequest`] and
//! receives a [`TreeDiff`] back. [`GitCli`] is the stock implementation.

mod git;

pub use git::GitCli;

use crate::model::TreeDiff;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two request shapes a diff provider answers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiffRequest {
    /// Whole-tree diff between two revisions.
    Tree { from: String, to: String },
    /// Diff restricted to paths matching `pattern`.
    File {
        from: String,
        to: String,
        pattern: String,
    },
}

impl DiffRequest {
    pub fn from_revision(&self) -> &str {
        match self {
            DiffRequest::Tree { from, .. } | DiffRequest::File { from, .. } => from,
        }
    }

    pub fn to_revision(&self) -> &str {
        match self {
            DiffRequest::Tree { to, .. } | DiffRequest::File { to, .. } => to,
        }
    }

    pub fn pattern(&self) -> Option<&str> {
        match self {
            DiffRequest::Tree { .. } => None,
            DiffRequest::File { pattern, .. } => Some(pattern),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("revision not found: {0}")]
    RevisionNotFound(String),
    #[error("git exited with {status}: {stderr}")]
    Git { status: i32, stderr: String },
    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] crate::parser::ParseError),
    #[error("git output is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Produces tree diffs for a revision pair.
#[async_trait]
pub trait DiffProvider: Send + Sync {
    async fn tree_diff(&self, request: &DiffRequest) -> Result<TreeDiff, ProviderError>;
}

/// Author and message of a commit, shown next to the diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMetadata {
    pub commit_id: String,
    pub summary: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub author_time: DateTime<Utc>,
}

#[async_trait]
pub trait CommitLookup: Send + Sync {
    async fn commit_metadata(&self, revision: &str) -> Result<CommitMetadata, ProviderError>;
}
