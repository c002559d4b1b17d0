//! CLI configuration via environment variables
//!
//! Settings that only concern the terminal front end live here; viewer
//! settings shared with other hosts come from `stepscope-config`.

use std::env;
use std::path::PathBuf;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Disable colored output (STEPSCOPE_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Custom history file path (STEPSCOPE_HISTORY_FILE=/path/to/file)
    pub history_file: Option<PathBuf>,
    /// Disable history (STEPSCOPE_NO_HISTORY=1)
    pub no_history: bool,
    /// Write logs to this file instead of stderr (STEPSCOPE_LOG_FILE)
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            no_color: env::var("STEPSCOPE_NO_COLOR").is_ok() || env::var("NO_COLOR").is_ok(),
            history_file: env::var("STEPSCOPE_HISTORY_FILE").ok().map(PathBuf::from),
            no_history: env::var("STEPSCOPE_NO_HISTORY").is_ok(),
            log_file: env::var("STEPSCOPE_LOG_FILE").ok().map(PathBuf::from),
        }
    }

    /// Get the history file path
    ///
    /// Returns:
    /// 1. None if history is disabled
    /// 2. STEPSCOPE_HISTORY_FILE if set
    /// 3. ~/.stepscope/history if home directory exists
    pub fn get_history_path(&self) -> Option<PathBuf> {
        if self.no_history {
            return None;
        }
        if let Some(ref path) = self.history_file {
            return Some(path.clone());
        }
        dirs::home_dir().map(|home| home.join(".stepscope").join("history"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
