//! Diff View Actions
//!
//! Semantic inputs the diff view understands. The application maps its key
//! events onto these and dispatches them with [`crate::DiffView::handle_action`].

/// Actions that can be performed on a diff view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffAction {
    // === Scrolling ===
    /// Scroll down one line
    ScrollDown,
    /// Scroll up one line
    ScrollUp,
    /// Scroll down half page
    ScrollHalfDown,
    /// Scroll up half page
    ScrollHalfUp,
    /// Scroll down full page
    ScrollPageDown,
    /// Scroll up full page
    ScrollPageUp,
    /// Jump to the first line
    ScrollTop,
    /// Jump to the last line
    ScrollBottom,

    // === File Navigation ===
    /// Move to next file
    NextFile,
    /// Move to previous file
    PrevFile,
    /// Select a specific file by index
    SelectFile(usize),

    // === Expansion ===
    /// Expand or collapse the selected file
    ToggleFile,
    /// Expand every file
    ExpandAll,
    /// Collapse every file
    CollapseAll,

    // === General ===
    /// Ask the application to fetch the diff again
    Reload,
    /// Close the diff view
    Close,

    // === Viewport ===
    /// Set the viewport dimensions (for scroll calculations)
    SetViewport { width: u16, height: u16 },
}

impl DiffAction {
    /// Check if this action is a scroll action
    pub fn is_scroll(&self) -> bool {
        matches!(
            self,
            DiffAction::ScrollDown
                | DiffAction::ScrollUp
                | DiffAction::ScrollHalfDown
                | DiffAction::ScrollHalfUp
                | DiffAction::ScrollPageDown
                | DiffAction::ScrollPageUp
                | DiffAction::ScrollTop
                | DiffAction::ScrollBottom
        )
    }

    /// Check if this action moves between files
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            DiffAction::NextFile | DiffAction::PrevFile | DiffAction::SelectFile(_)
        )
    }

    /// Check if this action changes which files are expanded
    pub fn is_expansion(&self) -> bool {
        matches!(
            self,
            DiffAction::ToggleFile | DiffAction::ExpandAll | DiffAction::CollapseAll
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_scroll() {
        assert!(DiffAction::ScrollPageDown.is_scroll());
        assert!(DiffAction::ScrollTop.is_scroll());
        assert!(!DiffAction::NextFile.is_scroll());
    }

    #[test]
    fn test_is_navigation() {
        assert!(DiffAction::NextFile.is_navigation());
        assert!(DiffAction::SelectFile(2).is_navigation());
        assert!(!DiffAction::ScrollDown.is_navigation());
    }

    #[test]
    fn test_is_expansion() {
        assert!(DiffAction::ToggleFile.is_expansion());
        assert!(DiffAction::CollapseAll.is_expansion());
        assert!(!DiffAction::Close.is_expansion());
    }
}
