//! Configuration and cache directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/diff-review/`, `~/.cache/diff-review/`
//! - macOS: `~/Library/Application Support/diff-review/`, `~/Library/Caches/diff-review/`
//! - Windows: `%APPDATA%\diff-review\`, `%LOCALAPPDATA%\diff-review\`

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const APP_NAME: &str = "diff-review";

/// Get the application config directory, creating it if needed
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
    Ok(dir)
}

/// Get the application cache directory, creating it if needed
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
    Ok(dir)
}

/// Log file path for a run started at `timestamp`
pub fn log_file_path(timestamp: &str) -> Result<PathBuf> {
    Ok(cache_dir()?.join(format!("{APP_NAME}-{timestamp}.log")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_exists() {
        let dir = config_dir().unwrap();
        assert!(dir.exists());
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_cache_dir_exists() {
        let dir = cache_dir().unwrap();
        assert!(dir.exists());
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_log_file_lives_in_cache_dir() {
        let path = log_file_path("20240101_120000").unwrap();
        assert!(path.starts_with(cache_dir().unwrap()));
        assert!(path.ends_with("diff-review-20240101_120000.log"));
    }
}
