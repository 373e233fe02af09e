//! Diff content widget: file headers and rows of a loaded view.

use crate::model::ChangeType;
use crate::traits::ThemeProvider;
use crate::view::{DiffView, FileRender, RenderedRow, ScreenLine};
use ratatui::prelude::*;
use ratatui::widgets::Widget;

/// A single hint entry for the footer.
#[derive(Debug, Clone)]
pub struct FooterHint {
    /// The key (e.g., "n", "space").
    pub key: String,
    /// The description (e.g., "Next file").
    pub description: String,
}

impl FooterHint {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

/// Renders the visible slice of a view's screen lines.
pub struct DiffContentWidget<'a, T: ThemeProvider> {
    view: &'a DiffView,
    theme: &'a T,
}

impl<'a, T: ThemeProvider> DiffContentWidget<'a, T> {
    pub fn new(view: &'a DiffView, theme: &'a T) -> Self {
        Self { view, theme }
    }
}

impl<T: ThemeProvider> Widget for DiffContentWidget<'_, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.view.screen_lines();
        let visible = lines
            .iter()
            .skip(self.view.nav.scroll_offset)
            .take(area.height as usize);

        for (i, line) in visible.enumerate() {
            let y = area.y + i as u16;
            match *line {
                ScreenLine::FileHeader { file } => self.render_file_header(file, area.x, y, area.width, buf),
                ScreenLine::Row { file, row } => {
                    if let Some(file) = self.view.file(file) {
                        if let Some(row) = file.rows.get(row) {
                            self.render_row(file, row, area.x, y, area.width, buf);
                        }
                    }
                }
                ScreenLine::BinaryNotice { .. } => {
                    let style = Style::default().fg(self.theme.status_foreground());
                    buf.set_string(area.x + 2, y, "Binary file not shown", style);
                }
            }
        }
    }
}

impl<T: ThemeProvider> DiffContentWidget<'_, T> {
    fn render_file_header(&self, index: usize, x: u16, y: u16, width: u16, buf: &mut Buffer) {
        let Some(file) = self.view.file(index) else {
            return;
        };
        let bg = if index == self.view.nav.selected_file {
            self.theme.selected_file_background()
        } else {
            self.theme.metadata_background()
        };
        let style = Style::default().fg(self.theme.file_header_foreground()).bg(bg);
        fill(buf, x, y, width, style);

        let marker = if self.view.is_expanded(index) { "▾" } else { "▸" };
        let status = file.diff.status;
        let spans = [
            (format!("{marker} "), style),
            (
                format!("{} ", status.as_char()),
                style.fg(status.color()).add_modifier(Modifier::BOLD),
            ),
            (file.path().to_string(), style.add_modifier(Modifier::BOLD)),
            (format!("  +{}", file.diff.additions()), style.fg(Color::Green)),
            (format!(" -{}", file.diff.deletions()), style.fg(Color::Red)),
        ];

        let mut col = 0usize;
        for (text, span_style) in spans {
            col += put_truncated(buf, x, y, width as usize, col, &text, span_style);
        }
    }

    fn render_row(&self, file: &FileRender, row: &RenderedRow, x: u16, y: u16, width: u16, buf: &mut Buffer) {
        let bg = if row.highlighted {
            self.theme.highlight_background()
        } else {
            self.theme.row_background(row.change_type)
        };
        let base_style = Style::default().bg(bg);
        fill(buf, x, y, width, base_style);

        let line_no_width = line_no_width(file);
        let number_style = base_style.fg(self.theme.line_number_foreground());
        let number = |n: Option<u32>| match n {
            Some(n) => format!("{:>line_no_width$}", n),
            None => " ".repeat(line_no_width),
        };

        let prefix = row.change_type.map(|t| t.prefix()).unwrap_or(' ');
        let prefix_style = match row.change_type {
            Some(ChangeType::Add) => base_style.fg(Color::Green),
            Some(ChangeType::Remove) => base_style.fg(Color::Red),
            _ => base_style,
        };

        let width = width as usize;
        let mut col = 0;
        col += put_truncated(buf, x, y, width, col, &number(row.old_lineno), number_style);
        col += put_truncated(buf, x, y, width, col, " ", base_style);
        col += put_truncated(buf, x, y, width, col, &number(row.new_lineno), number_style);
        col += put_truncated(buf, x, y, width, col, " ", base_style);
        col += put_truncated(buf, x, y, width, col, &prefix.to_string(), prefix_style);

        let metadata = row.change_type == Some(ChangeType::Metadata);
        for span in &row.spans {
            if col >= width {
                break;
            }
            let mut style = base_style;
            if metadata {
                style = style.fg(self.theme.metadata_foreground());
            } else if let Some(fg) = span.fg {
                style = style.fg(fg);
            }
            if span.bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            if span.italic {
                style = style.add_modifier(Modifier::ITALIC);
            }
            if span.underline {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            col += put_truncated(buf, x, y, width, col, &span.text, style);
        }
    }
}

/// Digits needed for the largest line number in a file.
fn line_no_width(file: &FileRender) -> usize {
    file.rows
        .iter()
        .flat_map(|r| [r.old_lineno, r.new_lineno])
        .flatten()
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn fill(buf: &mut Buffer, x: u16, y: u16, width: u16, style: Style) {
    buf.set_style(Rect::new(x, y, width, 1), style);
}

/// Write `text` at column `col`, cut at `width`. Returns the columns used.
fn put_truncated(buf: &mut Buffer, x: u16, y: u16, width: usize, col: usize, text: &str, style: Style) -> usize {
    let available = width.saturating_sub(col);
    if available == 0 {
        return 0;
    }
    let text: String = text.replace('\t', "    ").chars().take(available).collect();
    let used = text.chars().count();
    buf.set_string(x + col as u16, y, &text, style);
    used
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::ScrollHint;
    use crate::highlight::PlainTokenizer;
    use crate::model::{DiffLine, FileDiff, TreeDiff};
    use crate::traits::DefaultTheme;
    use crate::view::DiffViewKey;

    fn row_string(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    fn view(hint: Option<ScrollHint>) -> DiffView {
        let file = FileDiff::new("src/main.rs").with_lines(vec![
            DiffLine::metadata('H', "@@ -1,2 +1,3 @@"),
            DiffLine::context("fn main() {", 1, 1),
            DiffLine::addition("    println!(\"hi\");", 2),
            DiffLine::context("}", 2, 3),
        ]);
        let mut view = DiffView::new(DiffViewKey::new("a", "b"), hint);
        let ticket = view.begin_fetch();
        view.complete_fetch(ticket, Ok(TreeDiff::new(vec![file])), &mut PlainTokenizer);
        view
    }

    #[test]
    fn test_renders_header_and_rows() {
        let view = view(None);
        let theme = DefaultTheme;
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);

        DiffContentWidget::new(&view, &theme).render(area, &mut buf);

        assert!(row_string(&buf, 0).starts_with("▾ M src/main.rs  +1 -0"));
        assert!(row_string(&buf, 1).contains("@@ -1,2 +1,3 @@"));
        assert!(row_string(&buf, 3).starts_with("  2 +    println!(\"hi\");"));
        assert_eq!(buf[(0, 3)].bg, theme.addition_background());
    }

    #[test]
    fn test_highlighted_row_background() {
        let view = view(ScrollHint::from_raw(Some("src/main.rs"), Some("Line 3")));
        let theme = DefaultTheme;
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);

        DiffContentWidget::new(&view, &theme).render(area, &mut buf);

        assert!(row_string(&buf, 4).contains('}'));
        assert_eq!(buf[(0, 4)].bg, theme.highlight_background());
        assert_eq!(buf[(0, 2)].bg, theme.context_background());
    }

    #[test]
    fn test_narrow_area_truncates() {
        let view = view(None);
        let area = Rect::new(0, 0, 8, 6);
        let mut buf = Buffer::empty(area);
        DiffContentWidget::new(&view, &DefaultTheme).render(area, &mut buf);
        assert_eq!(row_string(&buf, 3), "  2 +   ");
    }
}
