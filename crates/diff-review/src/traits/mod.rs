//! Extension traits for customizing diff view rendering.

mod theme_provider;

pub use theme_provider::{DefaultTheme, ThemeProvider};
