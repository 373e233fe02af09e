//! Trait for providing theme configuration to the diff view widget.

use crate::model::ChangeType;
use ratatui::style::Color;

/// Provides theme colors for the diff view.
///
/// Implement this trait to integrate the widget with your application's
/// theme system.
///
/// # Example
///
/// ```ignore
/// use diff_review::ThemeProvider;
/// use ratatui::style::Color;
///
/// struct MyAppTheme;
///
/// impl ThemeProvider for MyAppTheme {
///     fn addition_background(&self) -> Color {
///         Color::Rgb(30, 60, 30)
///     }
///
///     fn deletion_background(&self) -> Color {
///         Color::Rgb(60, 30, 30)
///     }
/// }
/// ```
pub trait ThemeProvider: Send + Sync {
    /// Background color for addition rows.
    fn addition_background(&self) -> Color;

    /// Background color for deletion rows.
    fn deletion_background(&self) -> Color;

    /// Background color for context rows.
    fn context_background(&self) -> Color {
        Color::Reset
    }

    /// Background color for file and hunk header rows.
    fn metadata_background(&self) -> Color {
        Color::Rgb(40, 40, 60)
    }

    /// Foreground color for file and hunk header text.
    fn metadata_foreground(&self) -> Color {
        Color::Cyan
    }

    /// Background color for rows inside the anchored range.
    fn highlight_background(&self) -> Color {
        Color::Rgb(80, 70, 20)
    }

    /// Foreground color for line numbers.
    fn line_number_foreground(&self) -> Color {
        Color::DarkGray
    }

    /// Foreground color for the file header bar.
    fn file_header_foreground(&self) -> Color {
        Color::White
    }

    /// Background color for the file header bar of the selected file.
    fn selected_file_background(&self) -> Color {
        Color::Rgb(50, 50, 80)
    }

    /// Foreground color for status messages (loading, errors, empty).
    fn status_foreground(&self) -> Color {
        Color::DarkGray
    }

    /// Foreground color for error messages.
    fn error_foreground(&self) -> Color {
        Color::Red
    }

    /// Row background for a change type. Unclassified rows get none.
    fn row_background(&self, change_type: Option<ChangeType>) -> Color {
        match change_type {
            Some(ChangeType::Add) => self.addition_background(),
            Some(ChangeType::Remove) => self.deletion_background(),
            Some(ChangeType::Metadata) => self.metadata_background(),
            Some(ChangeType::Unchanged) => self.context_background(),
            None => Color::Reset,
        }
    }
}

/// Default theme with sensible dark-mode colors.
#[derive(Debug, Clone, Default)]
pub struct DefaultTheme;

impl ThemeProvider for DefaultTheme {
    fn addition_background(&self) -> Color {
        Color::Rgb(30, 60, 30) // dark green
    }

    fn deletion_background(&self) -> Color {
        Color::Rgb(60, 30, 30) // dark red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = DefaultTheme;
        assert_eq!(theme.addition_background(), Color::Rgb(30, 60, 30));
        assert_eq!(theme.deletion_background(), Color::Rgb(60, 30, 30));
        assert_eq!(theme.context_background(), Color::Reset);
    }

    #[test]
    fn test_row_background_by_change_type() {
        let theme = DefaultTheme;
        assert_eq!(
            theme.row_background(Some(ChangeType::Add)),
            theme.addition_background()
        );
        assert_eq!(
            theme.row_background(Some(ChangeType::Metadata)),
            theme.metadata_background()
        );
        assert_eq!(theme.row_background(None), Color::Reset);
    }
}
