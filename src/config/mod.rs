//! Configuration management for aggrefiles
//!
//! Loads the optional `.aggrefiles.toml` project file and merges it with
//! command-line values into the settings for one run.

pub mod project_config;
pub mod settings;

// Re-export commonly used items
pub use project_config::{ProjectConfig, CONFIG_FILE_NAME};
pub use settings::{OutputTarget, Overrides, Settings, DEFAULT_EXTENSION, DEFAULT_OUTPUT};
