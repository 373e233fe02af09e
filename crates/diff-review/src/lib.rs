//! # diff-review
//!
//! A diff segmentation and synchronized line-index engine for reviewing the
//! changes between two git revisions in the terminal.
//!
//! ## Pipeline
//!
//! A [`TreeDiff`] arrives from a [`DiffProvider`]. For every file the view
//!
//! 1. splits diff lines into rendered rows and groups them into contiguous
//!    hunks ([`build_hunks`]),
//! 2. tokenizes the joined rows once through a [`SyntaxTokenizer`],
//! 3. classifies every token row by binary search over the hunks
//!    ([`classify_rows`]),
//! 4. flags the rows covered by the anchor range of a [`ScrollHint`] and
//!    scrolls to them once.
//!
//! ## Action-Based Architecture
//!
//! The view never reads key events. The application maps keys to
//! [`DiffAction`] values and reacts to the [`DiffEvent`]s they produce.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diff_review::{DiffView, DiffViewKey, GitCli, HintMailbox, ScrollHint, run_fetch};
//!
//! let mut mailbox = HintMailbox::new();
//! if let Some(hint) = ScrollHint::from_raw(Some("src/lib.rs"), Some("Lines 10-15")) {
//!     mailbox.post(hint);
//! }
//!
//! // Changes on `feature`, compared against `main`.
//! let mut view = DiffView::new(DiffViewKey::new("feature", "main"), mailbox.take());
//! let ticket = view.begin_fetch();
//! let response = run_fetch(&GitCli::new("."), ticket).await;
//! view.complete_response(response, &mut highlighter);
//!
//! if let Some(request) = view.take_scroll_request() {
//!     view.scroll_into_view(request, 3);
//! }
//! ```

pub mod action;
pub mod anchor;
pub mod classify;
pub mod event;
pub mod highlight;
pub mod model;
pub mod parser;
pub mod provider;
pub mod segment;
pub mod traits;
pub mod view;
pub mod widget;

// Re-export commonly used types
pub use action::DiffAction;
pub use anchor::{AnchorError, HighlightRange, HintMailbox, RangeHighlighter, ScrollHint};
pub use classify::{classify_rows, find_hunk_by_line, ClassifiedRow};
pub use event::DiffEvent;
pub use highlight::{DiffHighlighter, PlainTokenizer, SyntaxTokenizer};
pub use model::{
    ChangeType, DiffLine, FileDiff, FileStatus, HighlightedSpan, Hunk, HunkList, HunkOrderError,
    ThreadContext, TreeDiff,
};
pub use parser::{parse_unified_diff, ParseError};
pub use provider::{
    CommitLookup, CommitMetadata, DiffProvider, DiffRequest, GitCli, ProviderError,
};
pub use segment::{build_hunks, RowIndexMap, Segmentation};
pub use traits::{DefaultTheme, ThemeProvider};
pub use view::{
    run_fetch, DiffView, DiffViewKey, FetchOutcome, FetchResponse, FetchTicket, LoadState,
    Navigation, ScreenLine, ScrollRequest, ViewPhase,
};
pub use widget::{DiffViewWidget, FooterHint};
