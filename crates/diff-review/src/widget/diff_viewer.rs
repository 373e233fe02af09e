//! Composite diff view widget: border, title, status messages and content.

use super::{DiffContentWidget, FooterHint};
use crate::traits::ThemeProvider;
use crate::view::{DiffView, LoadState};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Widget};

/// The main diff view widget.
///
/// Wraps [`DiffContentWidget`] in a bordered block titled with the compared
/// revisions, and shows a centered message while loading, after a failure,
/// or when there is nothing to show.
///
/// # Example
///
/// ```ignore
/// use diff_review::{DiffView, DiffViewWidget};
/// use diff_review::traits::DefaultTheme;
///
/// let theme = DefaultTheme;
/// view.nav.viewport_height = DiffViewWidget::<DefaultTheme>::viewport_height(area);
/// frame.render_widget(DiffViewWidget::new(&view, &theme), area);
/// ```
pub struct DiffViewWidget<'a, T: ThemeProvider> {
    view: &'a DiffView,
    theme: &'a T,
    footer_hints: Vec<FooterHint>,
    focused: bool,
}

impl<'a, T: ThemeProvider> DiffViewWidget<'a, T> {
    pub fn new(view: &'a DiffView, theme: &'a T) -> Self {
        Self {
            view,
            theme,
            footer_hints: Vec::new(),
            focused: true,
        }
    }

    /// Set footer hints to display at the bottom border.
    pub fn with_footer_hints(mut self, hints: Vec<FooterHint>) -> Self {
        self.footer_hints = hints;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Content rows available inside `area` once the border is drawn.
    pub fn viewport_height(area: Rect) -> usize {
        area.height.saturating_sub(2) as usize
    }

    fn title(&self) -> String {
        let key = self.view.key();
        match &key.file_pattern {
            Some(pattern) => format!(
                " {}..{} ({}) ",
                key.target_revision, key.source_revision, pattern
            ),
            None => format!(" {}..{} ", key.target_revision, key.source_revision),
        }
    }

    fn footer_line(&self) -> Option<Line<'_>> {
        if self.footer_hints.is_empty() {
            return None;
        }
        let text_style = Style::default().fg(self.theme.status_foreground());
        let key_style = Style::default()
            .fg(self.theme.file_header_foreground())
            .add_modifier(Modifier::BOLD);

        let mut spans = vec![Span::raw(" ")];
        for (i, hint) in self.footer_hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", text_style));
            }
            spans.push(Span::styled(hint.key.as_str(), key_style));
            spans.push(Span::styled(format!(" {}", hint.description), text_style));
        }
        spans.push(Span::raw(" "));
        Some(Line::from(spans))
    }
}

impl<T: ThemeProvider> Widget for DiffViewWidget<'_, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(self.title());
        if let Some(footer) = self.footer_line() {
            block = block.title_bottom(footer);
        }

        let inner = block.inner(area);
        block.render(area, buf);

        let message = match self.view.load_state() {
            LoadState::Ready => None,
            LoadState::Loading => Some((
                "Loading diff...".to_string(),
                self.theme.status_foreground(),
            )),
            LoadState::Failed(err) => Some((err.clone(), self.theme.error_foreground())),
            LoadState::Empty => Some((
                "No differences".to_string(),
                self.theme.status_foreground(),
            )),
        };

        match message {
            Some((msg, color)) => {
                let width = msg.chars().count().min(inner.width as usize) as u16;
                let x = inner.x + inner.width.saturating_sub(width) / 2;
                let y = inner.y + inner.height / 2;
                let msg: String = msg.chars().take(width as usize).collect();
                buf.set_string(x, y, msg, Style::default().fg(color));
            }
            None => DiffContentWidget::new(self.view, self.theme).render(inner, buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::PlainTokenizer;
    use crate::model::{DiffLine, FileDiff, TreeDiff};
    use crate::provider::ProviderError;
    use crate::traits::DefaultTheme;
    use crate::view::DiffViewKey;

    fn screen(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(view: &DiffView, hints: Vec<FooterHint>) -> Buffer {
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        DiffViewWidget::new(view, &DefaultTheme)
            .with_footer_hints(hints)
            .render(area, &mut buf);
        buf
    }

    #[test]
    fn test_loading_message_and_title() {
        let mut view = DiffView::new(DiffViewKey::new("feature", "main").with_pattern("*.rs"), None);
        view.begin_fetch();

        let text = screen(&render(&view, Vec::new()));
        assert!(text.contains("main..feature (*.rs)"));
        assert!(text.contains("Loading diff..."));
    }

    #[test]
    fn test_failure_and_empty_messages() {
        let mut view = DiffView::new(DiffViewKey::new("a", "b"), None);
        let ticket = view.begin_fetch();
        view.complete_fetch(
            ticket,
            Err(ProviderError::RevisionNotFound("b".into())),
            &mut PlainTokenizer,
        );
        let buf = render(&view, Vec::new());
        assert!(screen(&buf).contains("Failed to get diff"));

        let mut view = DiffView::new(DiffViewKey::new("a", "b"), None);
        let ticket = view.begin_fetch();
        view.complete_fetch(ticket, Ok(TreeDiff::default()), &mut PlainTokenizer);
        assert!(screen(&render(&view, Vec::new())).contains("No differences"));
    }

    #[test]
    fn test_ready_view_renders_content_and_footer() {
        let file = FileDiff::new("lib.rs").with_lines(vec![
            DiffLine::metadata('H', "@@ -1 +1 @@"),
            DiffLine::removal("old", 1),
            DiffLine::addition("new", 1),
        ]);
        let mut view = DiffView::new(DiffViewKey::new("a", "b"), None);
        let ticket = view.begin_fetch();
        view.complete_fetch(ticket, Ok(TreeDiff::new(vec![file])), &mut PlainTokenizer);

        let text = screen(&render(&view, vec![FooterHint::new("q", "Close")]));
        assert!(text.contains("lib.rs"));
        assert!(text.contains("1   -old"));
        assert!(text.contains("q Close"));
    }

    #[test]
    fn test_viewport_height_excludes_border() {
        assert_eq!(DiffViewWidget::<DefaultTheme>::viewport_height(Rect::new(0, 0, 10, 12)), 10);
        assert_eq!(DiffViewWidget::<DefaultTheme>::viewport_height(Rect::new(0, 0, 10, 1)), 0);
    }
}
