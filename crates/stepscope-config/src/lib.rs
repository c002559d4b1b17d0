//! stepscope configuration
//!
//! Viewer settings come from TOML files and the environment:
//! - Global config (~/.stepscope/config.toml)
//! - Project config (stepscope.toml, found by walking up from the working directory)
//! - Environment variables (STEPSCOPE_*)
//!
//! # Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. Global config
//! 2. Project config
//! 3. Environment variables
//! 4. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use stepscope_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("caret glyph: {}", config.caret_glyph());
//! ```

pub mod loader;
pub mod viewer;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Name of the project-level configuration file
pub const PROJECT_CONFIG_FILE: &str = "stepscope.toml";

pub use loader::{Config, ConfigLoader};
pub use viewer::{PopBehaviorSetting, StackConfig, ViewConfig, ViewerConfig};
