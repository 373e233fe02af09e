//! Configuration and file paths for diff-review
//!
//! This crate provides:
//! - Configuration file lookup (working directory, config dir, home)
//! - Application configuration (AppConfig)
//! - Config and cache directory paths

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::load_config_file;
