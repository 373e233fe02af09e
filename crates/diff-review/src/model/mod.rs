//! Data models for diff representation.

mod diff;
mod hunk;
mod thread;

pub use diff::{ChangeType, DiffLine, FileDiff, FileStatus, HighlightedSpan, TreeDiff};
pub use hunk::{Hunk, HunkList, HunkOrderError};
pub use thread::{
    FilePosition, KnownProperty, PropertyKey, PropertyValue, ThreadContext, ThreadProperties,
    Vote, VoteMessage,
};
