//! Scroll offset and file selection.

/// Where the viewport sits in the flattened screen lines.
#[derive(Debug, Clone)]
pub struct NavigationState {
    /// Current file index.
    pub selected_file: usize,
    /// First visible screen line.
    pub scroll_offset: usize,
    /// Visible rows, updated by the application on resize.
    pub viewport_height: usize,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            selected_file: 0,
            scroll_offset: 0,
            viewport_height: 20,
        }
    }
}

impl NavigationState {
    pub fn scroll_down(&mut self, amount: usize, max_lines: usize) {
        self.scroll_offset = (self.scroll_offset + amount).min(max_lines.saturating_sub(1));
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn half_page(&self) -> usize {
        (self.viewport_height / 2).max(1)
    }

    pub fn page(&self) -> usize {
        self.viewport_height.max(1)
    }

    /// Keep the offset inside the content after it shrank.
    pub fn clamp(&mut self, max_lines: usize) {
        self.scroll_offset = self.scroll_offset.min(max_lines.saturating_sub(1));
    }

    /// Put `line` near the top, leaving `margin` lines above it.
    pub fn scroll_near_top(&mut self, line: usize, margin: usize) {
        self.scroll_offset = line.saturating_sub(margin);
    }
}
