//! Application state: one diff view, the git backend and the runtime the
//! fetches run on.

use anyhow::{Context, Result};
use diff_review::traits::DefaultTheme;
use diff_review::{
    run_fetch, CommitLookup, CommitMetadata, DiffAction, DiffEvent, DiffHighlighter, DiffView,
    DiffViewWidget, FetchOutcome, FetchResponse, FooterHint, GitCli, ProviderError,
};
use diff_review_config::AppConfig;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Results coming back from background tasks.
#[derive(Debug)]
pub enum AppMessage {
    Fetched(FetchResponse),
    Commit(Result<CommitMetadata, ProviderError>),
}

pub struct App {
    pub view: DiffView,
    pub running: bool,
    highlighter: DiffHighlighter,
    theme: DefaultTheme,
    git: Arc<GitCli>,
    runtime: Runtime,
    tx: UnboundedSender<AppMessage>,
    rx: UnboundedReceiver<AppMessage>,
    commit: Option<CommitMetadata>,
    scroll_margin: usize,
}

impl App {
    pub fn new(view: DiffView, git: GitCli, config: &AppConfig) -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let (tx, rx) = unbounded_channel();

        Ok(Self {
            view: view.with_expand_all_by_default(config.expand_all_by_default),
            running: true,
            highlighter: DiffHighlighter::with_theme_name(&config.highlight_theme),
            theme: DefaultTheme,
            git: Arc::new(git),
            runtime,
            tx,
            rx,
            commit: None,
            scroll_margin: config.scroll_margin,
        })
    }

    /// Fetch the diff for the view's current key in the background.
    pub fn start_fetch(&mut self) {
        let ticket = self.view.begin_fetch();
        log::info!(
            "Fetching diff {:?} (generation {})",
            ticket.request(),
            ticket.generation()
        );

        let git = Arc::clone(&self.git);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let response = run_fetch(git.as_ref(), ticket).await;
            if tx.send(AppMessage::Fetched(response)).is_err() {
                log::debug!("UI gone before the diff arrived");
            }
        });
    }

    /// Look up the commit under review for the header line.
    pub fn start_commit_lookup(&mut self) {
        let revision = self.view.key().source_revision.clone();
        let git = Arc::clone(&self.git);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = git.commit_metadata(&revision).await;
            let _ = tx.send(AppMessage::Commit(result));
        });
    }

    /// Apply whatever background results have arrived.
    pub fn process_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.apply_message(message);
        }
    }

    fn apply_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::Fetched(response) => {
                if self.view.complete_response(response, &mut self.highlighter)
                    == FetchOutcome::Applied
                {
                    self.scroll_to_anchor();
                }
            }
            AppMessage::Commit(Ok(commit)) => self.commit = Some(commit),
            AppMessage::Commit(Err(err)) => log::warn!("Commit lookup failed: {}", err),
        }
    }

    fn scroll_to_anchor(&mut self) {
        if let Some(request) = self.view.take_scroll_request() {
            if !self.view.scroll_into_view(request, self.scroll_margin) {
                log::debug!("Scroll target {:?} is not on screen", request);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = map_key(key) {
            self.dispatch(action);
        }
    }

    pub fn dispatch(&mut self, action: DiffAction) {
        for event in self.view.handle_action(action) {
            match event {
                DiffEvent::ReloadRequested => self.start_fetch(),
                DiffEvent::Close => self.running = false,
                DiffEvent::FileSelected { file_path, .. } => {
                    log::debug!("Selected {}", file_path)
                }
                DiffEvent::ExpansionChanged {
                    file_path,
                    expanded,
                } => log::debug!("{} expanded: {}", file_path, expanded),
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(frame.area());

        let height = DiffViewWidget::<DefaultTheme>::viewport_height(chunks[1]);
        if height != self.view.nav.viewport_height {
            self.dispatch(DiffAction::SetViewport {
                width: chunks[1].width,
                height: height as u16,
            });
        }

        frame.render_widget(Line::from(self.header_spans()), chunks[0]);
        frame.render_widget(
            DiffViewWidget::new(&self.view, &self.theme).with_footer_hints(footer_hints()),
            chunks[1],
        );
    }

    fn header_spans(&self) -> Vec<Span<'static>> {
        let mut spans = vec![Span::styled(
            " diff-review ",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        )];
        if let Some(commit) = &self.commit {
            let short_id: String = commit.commit_id.chars().take(8).collect();
            spans.push(Span::styled(
                format!(" {short_id} "),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::raw(commit.summary.clone()));
            spans.push(Span::styled(
                format!(
                    "  {} {}",
                    commit.author_name,
                    commit.author_time.format("%Y-%m-%d %H:%M")
                ),
                Style::default().fg(Color::DarkGray),
            ));
        }
        spans
    }
}

fn footer_hints() -> Vec<FooterHint> {
    vec![
        FooterHint::new("j/k", "Scroll"),
        FooterHint::new("n/p", "File"),
        FooterHint::new("space", "Toggle"),
        FooterHint::new("e/c", "Expand/Collapse all"),
        FooterHint::new("r", "Reload"),
        FooterHint::new("q", "Quit"),
    ]
}

/// Key bindings of the diff view.
pub fn map_key(key: KeyEvent) -> Option<DiffAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let action = match key.code {
        KeyCode::Char('d') if ctrl => DiffAction::ScrollHalfDown,
        KeyCode::Char('u') if ctrl => DiffAction::ScrollHalfUp,
        KeyCode::Char('c') if ctrl => DiffAction::Close,
        KeyCode::Char('j') | KeyCode::Down => DiffAction::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => DiffAction::ScrollUp,
        KeyCode::PageDown => DiffAction::ScrollPageDown,
        KeyCode::PageUp => DiffAction::ScrollPageUp,
        KeyCode::Char('g') | KeyCode::Home => DiffAction::ScrollTop,
        KeyCode::Char('G') | KeyCode::End => DiffAction::ScrollBottom,
        KeyCode::Char('n') | KeyCode::Tab => DiffAction::NextFile,
        KeyCode::Char('p') | KeyCode::BackTab => DiffAction::PrevFile,
        KeyCode::Char(' ') | KeyCode::Enter => DiffAction::ToggleFile,
        KeyCode::Char('e') => DiffAction::ExpandAll,
        KeyCode::Char('c') => DiffAction::CollapseAll,
        KeyCode::Char('r') => DiffAction::Reload,
        KeyCode::Char('q') | KeyCode::Esc => DiffAction::Close,
        _ => return None,
    };
    Some(action)
}
