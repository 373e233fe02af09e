//! Scroll/expansion orchestrator.
//!
//! A [`DiffView`] owns everything one diff activation needs: the query key,
//! the one-shot scroll hint it was opened with, the fetched files with their
//! classified rows, per-file expansion, and a guard making sure the
//! auto-scroll to the anchor fires once per (file, range).
//!
//! Lifecycle:
//!
//! ```text
//! Idle -> HintRead -> FilesExpanded -> RowsClassified -> Scrolled
//!   ^                                                      |
//!   +------------------ navigate(new key) -----------------+
//! ```

mod fetch;
mod navigation;
mod render;

pub use fetch::{run_fetch, DiffViewKey, FetchOutcome, FetchResponse, FetchTicket};
pub use navigation::NavigationState;
pub use render::{FileRender, RenderedRow};

use crate::action::DiffAction;
use crate::anchor::{HighlightRange, RangeHighlighter, ScrollHint};
use crate::event::DiffEvent;
use crate::highlight::SyntaxTokenizer;
use crate::model::TreeDiff;
use crate::provider::ProviderError;
use log::debug;

/// Where a view is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Idle,
    HintRead,
    FilesExpanded,
    RowsClassified,
    Scrolled,
}

/// What the view body shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    /// Terminal until the user reloads.
    Failed(String),
    /// The revisions have no differences.
    Empty,
    Ready,
}

/// Scroll the view so this row is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub file_index: usize,
    /// Row index within the file.
    pub row: usize,
}

/// One line of the flattened view, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenLine {
    FileHeader { file: usize },
    Row { file: usize, row: usize },
    BinaryNotice { file: usize },
}

/// Result of [`DiffView::navigate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Same key, same hint.
    Unchanged,
    /// Same key, new or dropped hint applied to the loaded files.
    Retargeted,
    /// New key: state was reset and a fetch is needed.
    Reloaded,
}

/// The (file, range) pair the last auto-scroll fired for.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScrollGuard {
    file: String,
    lines: Option<HighlightRange>,
}

impl From<&ScrollHint> for ScrollGuard {
    fn from(hint: &ScrollHint) -> Self {
        Self {
            file: hint.file.clone(),
            lines: hint.lines,
        }
    }
}

/// State of one diff view.
#[derive(Debug)]
pub struct DiffView {
    key: DiffViewKey,
    hint: Option<ScrollHint>,
    phase: ViewPhase,
    load_state: LoadState,
    generation: u64,
    in_flight: Option<u64>,
    files: Vec<FileRender>,
    expanded: Vec<bool>,
    expand_all_by_default: bool,
    scroll_target: Option<ScrollRequest>,
    scrolled_for: Option<ScrollGuard>,
    pub nav: NavigationState,
}

impl DiffView {
    /// Activate a view. The hint is consumed here and nowhere else.
    pub fn new(key: DiffViewKey, hint: Option<ScrollHint>) -> Self {
        if let Some(hint) = &hint {
            debug!("Diff view opened with hint {} {:?}", hint.file, hint.lines);
        }
        Self {
            key,
            hint,
            phase: ViewPhase::HintRead,
            load_state: LoadState::Loading,
            generation: 0,
            in_flight: None,
            files: Vec::new(),
            expanded: Vec::new(),
            expand_all_by_default: true,
            scroll_target: None,
            scrolled_for: None,
            nav: NavigationState::default(),
        }
    }

    /// Whether all files start expanded when there is no hint.
    pub fn with_expand_all_by_default(mut self, expand: bool) -> Self {
        self.expand_all_by_default = expand;
        self
    }

    pub fn key(&self) -> &DiffViewKey {
        &self.key
    }

    pub fn hint(&self) -> Option<&ScrollHint> {
        self.hint.as_ref()
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn files(&self) -> &[FileRender] {
        &self.files
    }

    pub fn file(&self, index: usize) -> Option<&FileRender> {
        self.files.get(index)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    // === Fetching ===

    /// Issue a new fetch for the current key. Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.load_state = LoadState::Loading;
        FetchTicket {
            generation: self.generation,
            key: self.key.clone(),
            request: self.key.request(),
        }
    }

    /// Apply a finished fetch, unless it was superseded.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<TreeDiff, ProviderError>,
        tokenizer: &mut dyn SyntaxTokenizer,
    ) -> FetchOutcome {
        if self.in_flight != Some(ticket.generation) || ticket.key != self.key {
            debug!(
                "Discarding stale diff response (generation {}, current {})",
                ticket.generation, self.generation
            );
            return FetchOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Err(err) => {
                log::error!("Failed to get diff for {:?}: {}", ticket.request, err);
                self.phase = ViewPhase::Idle;
                self.files.clear();
                self.expanded.clear();
                self.scroll_target = None;
                self.load_state = LoadState::Failed(format!("Failed to get diff: {err}"));
            }
            Ok(diff) => self.load(diff, tokenizer),
        }
        FetchOutcome::Applied
    }

    /// Convenience for [`FetchResponse`] values coming back over a channel.
    pub fn complete_response(
        &mut self,
        response: FetchResponse,
        tokenizer: &mut dyn SyntaxTokenizer,
    ) -> FetchOutcome {
        self.complete_fetch(response.ticket, response.result, tokenizer)
    }

    fn load(&mut self, diff: TreeDiff, tokenizer: &mut dyn SyntaxTokenizer) {
        self.load_state = if diff.is_empty() {
            LoadState::Empty
        } else {
            LoadState::Ready
        };

        self.files = diff
            .files
            .into_iter()
            .map(|file| FileRender::build(file, &mut *tokenizer))
            .collect();
        self.init_expansion();
        self.phase = ViewPhase::FilesExpanded;

        self.apply_hint();
        self.phase = ViewPhase::RowsClassified;
        self.nav.clamp(self.screen_line_count());
        debug!(
            "Loaded {} files, scroll target {:?}",
            self.files.len(),
            self.scroll_target
        );
    }

    /// Only the hinted file starts expanded; without a hint, every file does
    /// (unless configured otherwise).
    fn init_expansion(&mut self) {
        let target = self.hint.as_ref().map(|hint| hint.file.as_str());
        self.expanded = self
            .files
            .iter()
            .map(|file| match target {
                Some(path) => file.matches_path(path),
                None => self.expand_all_by_default,
            })
            .collect();
    }

    /// Flag the rows of the hinted file and work out where to scroll.
    fn apply_hint(&mut self) {
        self.scroll_target = None;
        let Some(hint) = self.hint.as_ref() else {
            self.files.iter_mut().for_each(FileRender::clear_highlight);
            return;
        };

        let highlighter = RangeHighlighter::new(hint.lines);
        let mut first_match = true;
        for (file_index, file) in self.files.iter_mut().enumerate() {
            if !file.matches_path(&hint.file) {
                file.clear_highlight();
                continue;
            }
            file.apply_highlight(&highlighter);
            if first_match {
                first_match = false;
                self.scroll_target = hint
                    .lines
                    .and_then(|range| file.scroll_target(range))
                    .map(|row| ScrollRequest { file_index, row });
                self.nav.selected_file = file_index;
            }
        }
    }

    // === Scrolling to the anchor ===

    /// The pending auto-scroll, handed out once per (file, range).
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        if self.phase != ViewPhase::RowsClassified {
            return None;
        }
        let request = self.scroll_target?;
        let guard = ScrollGuard::from(self.hint.as_ref()?);
        if self.scrolled_for.as_ref() == Some(&guard) {
            return None;
        }

        debug!("Scrolling to {} row {}", guard.file, request.row);
        self.scrolled_for = Some(guard);
        self.phase = ViewPhase::Scrolled;
        Some(request)
    }

    /// Move the viewport so the requested row sits `margin` lines below the top.
    pub fn scroll_into_view(&mut self, request: ScrollRequest, margin: usize) -> bool {
        match self.screen_offset_of(request) {
            Some(offset) => {
                self.nav.selected_file = request.file_index;
                self.nav.scroll_near_top(offset, margin);
                true
            }
            None => false,
        }
    }

    // === Navigation between views ===

    /// Point the view at a (possibly) new query and hint.
    pub fn navigate(&mut self, key: DiffViewKey, hint: Option<ScrollHint>) -> Navigation {
        if key != self.key {
            debug!("Diff view key changed, resetting");
            let expand_all_by_default = self.expand_all_by_default;
            let viewport_height = self.nav.viewport_height;
            let generation = self.generation;

            *self = Self::new(key, hint).with_expand_all_by_default(expand_all_by_default);
            self.generation = generation;
            self.nav.viewport_height = viewport_height;
            return Navigation::Reloaded;
        }

        if self.hint == hint {
            return Navigation::Unchanged;
        }
        debug!("Retargeting diff view to {:?}", hint);
        self.hint = hint;
        if self.load_state == LoadState::Ready {
            self.init_expansion();
            self.phase = ViewPhase::FilesExpanded;
            self.apply_hint();
            self.phase = ViewPhase::RowsClassified;
            self.nav.clamp(self.screen_line_count());
        }
        Navigation::Retargeted
    }

    // === Expansion ===

    pub fn is_expanded(&self, file_index: usize) -> bool {
        self.expanded.get(file_index).copied().unwrap_or(false)
    }

    /// Flip a file's expansion; returns the new state.
    pub fn toggle_file(&mut self, file_index: usize) -> Option<bool> {
        let expanded = self.expanded.get_mut(file_index)?;
        *expanded = !*expanded;
        let now = *expanded;
        self.nav.clamp(self.screen_line_count());
        Some(now)
    }

    pub fn expand_all(&mut self) -> Vec<usize> {
        self.set_all(true)
    }

    pub fn collapse_all(&mut self) -> Vec<usize> {
        self.set_all(false)
    }

    /// Returns the indices that changed.
    fn set_all(&mut self, value: bool) -> Vec<usize> {
        let changed = self
            .expanded
            .iter_mut()
            .enumerate()
            .filter(|(_, expanded)| **expanded != value)
            .map(|(index, expanded)| {
                *expanded = value;
                index
            })
            .collect();
        self.nav.clamp(self.screen_line_count());
        changed
    }

    // === Screen layout ===

    fn file_height(&self, file_index: usize) -> usize {
        let Some(file) = self.files.get(file_index) else {
            return 0;
        };
        let body = match (self.is_expanded(file_index), file.is_binary()) {
            (false, _) => 0,
            (true, true) => 1,
            (true, false) => file.rows.len(),
        };
        1 + body
    }

    pub fn screen_line_count(&self) -> usize {
        (0..self.files.len()).map(|i| self.file_height(i)).sum()
    }

    /// Flattened lines for the widget. Empty unless the view is ready.
    pub fn screen_lines(&self) -> Vec<ScreenLine> {
        let mut lines = Vec::with_capacity(self.screen_line_count());
        if self.load_state != LoadState::Ready {
            return lines;
        }
        for (file_index, file) in self.files.iter().enumerate() {
            lines.push(ScreenLine::FileHeader { file: file_index });
            if !self.is_expanded(file_index) {
                continue;
            }
            if file.is_binary() {
                lines.push(ScreenLine::BinaryNotice { file: file_index });
            } else {
                lines.extend((0..file.rows.len()).map(|row| ScreenLine::Row {
                    file: file_index,
                    row,
                }));
            }
        }
        lines
    }

    /// Screen line of a file's header.
    pub fn file_header_offset(&self, file_index: usize) -> Option<usize> {
        (file_index < self.files.len())
            .then(|| (0..file_index).map(|i| self.file_height(i)).sum())
    }

    /// Screen line showing a row, if its file is expanded.
    pub fn screen_offset_of(&self, request: ScrollRequest) -> Option<usize> {
        let file = self.files.get(request.file_index)?;
        if !self.is_expanded(request.file_index) || request.row >= file.rows.len() {
            return None;
        }
        Some(self.file_header_offset(request.file_index)? + 1 + request.row)
    }

    /// File the given screen line belongs to.
    pub fn file_at_offset(&self, offset: usize) -> Option<usize> {
        let mut start = 0;
        for file_index in 0..self.files.len() {
            let end = start + self.file_height(file_index);
            if offset < end {
                return Some(file_index);
            }
            start = end;
        }
        None
    }

    // === Actions ===

    /// Handle an action, returning events for the application.
    pub fn handle_action(&mut self, action: DiffAction) -> Vec<DiffEvent> {
        let mut events = Vec::new();
        let max_lines = self.screen_line_count();
        let is_scroll = action.is_scroll();

        match action {
            DiffAction::ScrollDown => self.nav.scroll_down(1, max_lines),
            DiffAction::ScrollUp => self.nav.scroll_up(1),
            DiffAction::ScrollHalfDown => self.nav.scroll_down(self.nav.half_page(), max_lines),
            DiffAction::ScrollHalfUp => self.nav.scroll_up(self.nav.half_page()),
            DiffAction::ScrollPageDown => self.nav.scroll_down(self.nav.page(), max_lines),
            DiffAction::ScrollPageUp => self.nav.scroll_up(self.nav.page()),
            DiffAction::ScrollTop => self.nav.scroll_offset = 0,
            DiffAction::ScrollBottom => {
                self.nav.scroll_offset = max_lines.saturating_sub(self.nav.page())
            }
            DiffAction::NextFile => {
                let next = self.nav.selected_file + 1;
                events.extend(self.select_file(next));
            }
            DiffAction::PrevFile => {
                if let Some(prev) = self.nav.selected_file.checked_sub(1) {
                    events.extend(self.select_file(prev));
                }
            }
            DiffAction::SelectFile(index) => events.extend(self.select_file(index)),
            DiffAction::ToggleFile => {
                let index = self.nav.selected_file;
                if let Some(expanded) = self.toggle_file(index) {
                    if let Some(offset) = self.file_header_offset(index) {
                        self.nav.scroll_offset = offset;
                    }
                    events.push(self.expansion_event(index, expanded));
                }
            }
            DiffAction::ExpandAll => {
                for index in self.expand_all() {
                    events.push(self.expansion_event(index, true));
                }
            }
            DiffAction::CollapseAll => {
                for index in self.collapse_all() {
                    events.push(self.expansion_event(index, false));
                }
            }
            DiffAction::Reload => events.push(DiffEvent::ReloadRequested),
            DiffAction::Close => events.push(DiffEvent::Close),
            DiffAction::SetViewport { height, .. } => {
                self.nav.viewport_height = height as usize;
            }
        }

        if is_scroll {
            if let Some(file_index) = self.file_at_offset(self.nav.scroll_offset) {
                self.nav.selected_file = file_index;
            }
        }
        events
    }

    fn select_file(&mut self, index: usize) -> Option<DiffEvent> {
        let offset = self.file_header_offset(index)?;
        self.nav.selected_file = index;
        self.nav.scroll_offset = offset;
        Some(DiffEvent::FileSelected {
            file_path: self.files[index].path().to_string(),
            file_index: index,
        })
    }

    fn expansion_event(&self, index: usize, expanded: bool) -> DiffEvent {
        DiffEvent::ExpansionChanged {
            file_path: self
                .files
                .get(index)
                .map(|f| f.path().to_string())
                .unwrap_or_default(),
            expanded,
        }
    }
}
