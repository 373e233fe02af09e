//! Application configuration
//!
//! Configuration loaded from `.diff-review.toml`.

use serde::{Deserialize, Serialize};

/// Application configuration loaded from `.diff-review.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Syntect theme used for syntax highlighting
    #[serde(default = "default_highlight_theme")]
    pub highlight_theme: String,

    /// Unchanged lines git includes around each change (`-U`)
    #[serde(default = "default_context_lines")]
    pub context_lines: u32,

    /// Rows kept above an auto-scrolled anchor
    #[serde(default = "default_scroll_margin")]
    pub scroll_margin: usize,

    /// Expand every file when the view opens without an anchor
    #[serde(default = "default_expand_all")]
    pub expand_all_by_default: bool,
}

fn default_highlight_theme() -> String {
    "base16-ocean.dark".to_string()
}

fn default_context_lines() -> u32 {
    3
}

fn default_scroll_margin() -> usize {
    3
}

fn default_expand_all() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            highlight_theme: default_highlight_theme(),
            context_lines: default_context_lines(),
            scroll_margin: default_scroll_margin(),
            expand_all_by_default: default_expand_all(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        match crate::load_config_file() {
            Some(content) => Self::from_toml_or_default(&content),
            None => {
                log::debug!("Using default app config");
                Self::default()
            }
        }
    }

    fn from_toml_or_default(content: &str) -> Self {
        match toml::from_str(content) {
            Ok(config) => {
                log::info!("Loaded app config from file");
                config
            }
            Err(e) => {
                log::warn!("Failed to parse config file: {}", e);
                Self::default()
            }
        }
    }
}
