//! Events emitted by the diff view for the parent application to handle.

/// Events emitted by [`crate::DiffView::handle_action`].
///
/// The view performs no side effects itself: refetching, quitting and status
/// bar updates are the application's job.
///
/// # Example
///
/// ```ignore
/// for event in view.handle_action(DiffAction::Reload) {
///     match event {
///         DiffEvent::ReloadRequested => spawn_fetch(view.begin_fetch()),
///         DiffEvent::Close => break,
///         _ => {}
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffEvent {
    /// The selected file changed.
    FileSelected {
        /// Path of the selected file.
        file_path: String,
        /// Index of the file in the view.
        file_index: usize,
    },

    /// A file was expanded or collapsed.
    ExpansionChanged {
        file_path: String,
        expanded: bool,
    },

    /// The user asked for the diff to be fetched again.
    ReloadRequested,

    /// The user wants to close the view.
    Close,
}
