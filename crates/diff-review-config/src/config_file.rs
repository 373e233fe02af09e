//! Locating the config file.

use crate::paths::config_dir;
use std::path::PathBuf;

const CONFIG_FILE: &str = ".diff-review.toml";
const CONFIG_DIR_FILE: &str = "config.toml";

/// Places a config file may live, most specific first: the working
/// directory, the application config directory, then `$HOME`.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    match config_dir() {
        Ok(dir) => paths.push(dir.join(CONFIG_DIR_FILE)),
        Err(err) => log::debug!("Skipping config directory: {:#}", err),
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(CONFIG_FILE));
    }
    paths
}

/// Content of the first config file found, if any.
pub fn load_config_file() -> Option<String> {
    read_first(&candidate_paths())
}

fn read_first(paths: &[PathBuf]) -> Option<String> {
    paths
        .iter()
        .find_map(|path| match std::fs::read_to_string(path) {
            Ok(content) => {
                log::debug!("Loaded config from {}", path.display());
                Some(content)
            }
            Err(_) => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_existing_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let local = dir.path().join("local.toml");
        let home = dir.path().join("home.toml");
        std::fs::write(&local, "scroll_margin = 1").unwrap();
        std::fs::write(&home, "scroll_margin = 9").unwrap();

        let content = read_first(&[missing.clone(), local, home]);
        assert_eq!(content.as_deref(), Some("scroll_margin = 1"));
        assert_eq!(read_first(&[missing]), None);
    }

    #[test]
    fn test_candidates_search_config_dir_between_cwd_and_home() {
        let paths = candidate_paths();
        assert_eq!(paths[0], PathBuf::from(CONFIG_FILE));
        assert_eq!(paths[1], config_dir().unwrap().join(CONFIG_DIR_FILE));
    }
}
