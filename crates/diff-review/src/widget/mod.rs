//! Ratatui widgets for the diff view.

mod diff_content;
mod diff_viewer;

pub use diff_content::{DiffContentWidget, FooterHint};
pub use diff_viewer::DiffViewWidget;
