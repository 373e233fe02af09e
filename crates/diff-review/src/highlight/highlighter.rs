//! Syntax highlighter using syntect.

use super::SyntaxTokenizer;
use crate::model::HighlightedSpan;
use ratatui::style::Color;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Tokenizes whole files with syntect, keeping parser state across rows.
pub struct DiffHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    /// Tokenized blobs keyed by a hash of (language hint, code).
    cache: HashMap<u64, Vec<Vec<HighlightedSpan>>>,
    max_cache_size: usize,
    /// Syntax index by lowercase file extension.
    syntax_cache: HashMap<String, usize>,
}

impl std::fmt::Debug for DiffHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffHighlighter")
            .field("cache_size", &self.cache.len())
            .field("max_cache_size", &self.max_cache_size)
            .finish()
    }
}

impl Default for DiffHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffHighlighter {
    pub fn new() -> Self {
        Self::with_theme_name(DEFAULT_THEME)
    }

    /// Create a highlighter with a named syntect theme, falling back to the
    /// default theme for unknown names.
    pub fn with_theme_name(theme_name: &str) -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = match theme_set.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                log::warn!("Unknown highlight theme {:?}, using {}", theme_name, DEFAULT_THEME);
                theme_set
                    .themes
                    .remove(DEFAULT_THEME)
                    .unwrap_or_default()
            }
        };
        Self::with_theme(theme)
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            cache: HashMap::new(),
            max_cache_size: 64,
            syntax_cache: HashMap::new(),
        }
    }

    pub fn with_max_cache(mut self, size: usize) -> Self {
        self.max_cache_size = size;
        self
    }

    /// Theme names bundled with syntect; `with_theme_name` accepts these.
    pub fn available_themes() -> Vec<&'static str> {
        vec![
            "base16-ocean.dark",
            "base16-ocean.light",
            "base16-eighties.dark",
            "base16-mocha.dark",
            "InspiredGitHub",
            "Solarized (dark)",
            "Solarized (light)",
        ]
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Syntax index for a path, cached by extension.
    fn syntax_index(&mut self, path: &str) -> usize {
        let ext = std::path::Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if let Some(&idx) = self.syntax_cache.get(&ext) {
            return idx;
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_extension(&ext)
            .or_else(|| self.syntax_set.find_syntax_for_file(path).ok().flatten())
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let idx = self
            .syntax_set
            .syntaxes()
            .iter()
            .position(|s| s.name == syntax.name)
            .unwrap_or(0);

        self.syntax_cache.insert(ext, idx);
        idx
    }

    fn tokenize_with_syntax(&self, syntax: &SyntaxReference, code: &str) -> Vec<Vec<HighlightedSpan>> {
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        // Split on '\n' rather than iterating lines so a trailing empty row
        // still produces its own token row.
        code.split('\n')
            .map(|row| {
                let line = format!("{row}\n");
                match highlighter.highlight_line(&line, &self.syntax_set) {
                    Ok(ranges) => ranges
                        .iter()
                        .filter_map(|(style, text)| {
                            let text = text.strip_suffix('\n').unwrap_or(text);
                            (!text.is_empty()).then(|| syntect_to_span(*style, text))
                        })
                        .collect(),
                    Err(err) => {
                        log::debug!("Highlighting failed, falling back to plain text: {}", err);
                        vec![HighlightedSpan::plain(row)]
                    }
                }
            })
            .collect()
    }

    fn cache_key(language_hint: &str, code: &str) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        language_hint.hash(&mut hasher);
        code.hash(&mut hasher);
        hasher.finish()
    }
}

impl SyntaxTokenizer for DiffHighlighter {
    fn tokenize(&mut self, code: &str, language_hint: &str) -> Vec<Vec<HighlightedSpan>> {
        let key = Self::cache_key(language_hint, code);
        if let Some(rows) = self.cache.get(&key) {
            return rows.clone();
        }

        let syntax_idx = self.syntax_index(language_hint);
        let syntax = self
            .syntax_set
            .syntaxes()
            .get(syntax_idx)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let rows = self.tokenize_with_syntax(syntax, code);

        if self.cache.len() >= self.max_cache_size {
            let to_remove = (self.max_cache_size / 5).max(1);
            let keys: Vec<_> = self.cache.keys().take(to_remove).copied().collect();
            for key in keys {
                self.cache.remove(&key);
            }
        }
        self.cache.insert(key, rows.clone());
        rows
    }
}

fn syntect_to_span(style: Style, text: &str) -> HighlightedSpan {
    HighlightedSpan {
        text: text.to_string(),
        fg: Some(Color::Rgb(
            style.foreground.r,
            style.foreground.g,
            style.foreground.b,
        )),
        bg: if style.background.a > 0 {
            Some(Color::Rgb(
                style.background.r,
                style.background.g,
                style.background.b,
            ))
        } else {
            None
        },
        bold: style.font_style.contains(FontStyle::BOLD),
        italic: style.font_style.contains(FontStyle::ITALIC),
        underline: style.font_style.contains(FontStyle::UNDERLINE),
    }
}
