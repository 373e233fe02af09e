//! Fetch generations: every request carries the generation it was issued
//! under, and only a response for the current generation is applied.

use crate::model::TreeDiff;
use crate::provider::{DiffProvider, DiffRequest, ProviderError};

/// The query a view displays.
///
/// Named the way a pull request is: `source_revision` carries the changes,
/// `target_revision` is the base they are merged into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffViewKey {
    pub source_revision: String,
    pub target_revision: String,
    pub file_pattern: Option<String>,
}

impl DiffViewKey {
    pub fn new(source_revision: impl Into<String>, target_revision: impl Into<String>) -> Self {
        Self {
            source_revision: source_revision.into(),
            target_revision: target_revision.into(),
            file_pattern: None,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = Some(pattern.into());
        self
    }

    /// Diff from the target (base) to the source, so additions are the
    /// source's changes. A pattern narrows the request to a single-file diff.
    pub fn request(&self) -> DiffRequest {
        let from = self.target_revision.clone();
        let to = self.source_revision.clone();
        match &self.file_pattern {
            Some(pattern) => DiffRequest::File {
                from,
                to,
                pattern: pattern.clone(),
            },
            None => DiffRequest::Tree { from, to },
        }
    }
}

/// Handle for one in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub(super) generation: u64,
    pub(super) key: DiffViewKey,
    pub(super) request: DiffRequest,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> &DiffViewKey {
        &self.key
    }

    pub fn request(&self) -> &DiffRequest {
        &self.request
    }
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch or a navigation superseded this one; nothing changed.
    Stale,
}

/// A finished fetch, ready to be handed back to the view.
#[derive(Debug)]
pub struct FetchResponse {
    pub ticket: FetchTicket,
    pub result: Result<TreeDiff, ProviderError>,
}

/// Run a ticket's request against a provider.
pub async fn run_fetch(provider: &dyn DiffProvider, ticket: FetchTicket) -> FetchResponse {
    let result = provider.tree_diff(ticket.request()).await;
    FetchResponse { ticket, result }
}
