//! Viewer configuration file schema
//!
//! The same schema is used by the global file and by project files.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default glyph drawn for the caret marker
pub const DEFAULT_CARET_GLYPH: char = '|';

/// Default width of frame names in the stack panel
pub const DEFAULT_MAX_NAME_WIDTH: usize = 40;

/// Viewer configuration from a TOML file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ViewerConfig {
    /// Source view settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewConfig>,

    /// Stack panel settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<StackConfig>,
}

/// Source view settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    /// Glyph drawn for the caret marker (exactly one character)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caret_glyph: Option<String>,

    /// What the caret does when a frame returns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pop_behavior: Option<PopBehaviorSetting>,
}

/// Stack panel settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct StackConfig {
    /// Frame names longer than this are truncated (8..=200)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_name_width: Option<usize>,
}

/// Caret behaviour on frame pop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PopBehaviorSetting {
    /// Keep the caret where the returning frame left it
    #[default]
    Retain,
    /// Move the caret to the frame that becomes active
    Resync,
}

impl FromStr for PopBehaviorSetting {
    type Err = ConfigError;

    fn from_str(value: &str) -> ConfigResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "resync" => Ok(Self::Resync),
            other => Err(ConfigError::InvalidValue {
                field: "view.pop_behavior".to_string(),
                reason: format!("must be 'retain' or 'resync', got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for PopBehaviorSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retain => write!(f, "retain"),
            Self::Resync => write!(f, "resync"),
        }
    }
}

impl ViewerConfig {
    /// Load viewer configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(glyph) = self.view.as_ref().and_then(|v| v.caret_glyph.as_deref()) {
            validate_caret_glyph(glyph)?;
        }

        if let Some(width) = self.stack.as_ref().and_then(|s| s.max_name_width) {
            if !(8..=200).contains(&width) {
                return Err(ConfigError::InvalidValue {
                    field: "stack.max_name_width".to_string(),
                    reason: format!("must be between 8 and 200, got {}", width),
                });
            }
        }

        Ok(())
    }

    /// Get the global config file path (~/.stepscope/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".stepscope").join("config.toml"))
    }

    /// Configured caret glyph, if any
    pub fn caret_glyph(&self) -> Option<char> {
        self.view
            .as_ref()
            .and_then(|v| v.caret_glyph.as_deref())
            .and_then(|g| g.chars().next())
    }

    /// Configured pop behaviour, if any
    pub fn pop_behavior(&self) -> Option<PopBehaviorSetting> {
        self.view.as_ref().and_then(|v| v.pop_behavior)
    }

    /// Configured frame name width, if any
    pub fn max_name_width(&self) -> Option<usize> {
        self.stack.as_ref().and_then(|s| s.max_name_width)
    }

    /// Merge another config into this one
    /// Other config takes precedence field by field for non-None values
    pub fn merge(&mut self, other: &ViewerConfig) {
        if let Some(other_view) = &other.view {
            let view = self.view.get_or_insert_with(ViewConfig::default);
            if other_view.caret_glyph.is_some() {
                view.caret_glyph = other_view.caret_glyph.clone();
            }
            if other_view.pop_behavior.is_some() {
                view.pop_behavior = other_view.pop_behavior;
            }
        }
        if let Some(other_stack) = &other.stack {
            let stack = self.stack.get_or_insert_with(StackConfig::default);
            if other_stack.max_name_width.is_some() {
                stack.max_name_width = other_stack.max_name_width;
            }
        }
    }
}

/// A caret glyph must be exactly one character
pub(crate) fn validate_caret_glyph(glyph: &str) -> ConfigResult<()> {
    if glyph.chars().count() != 1 {
        return Err(ConfigError::InvalidValue {
            field: "view.caret_glyph".to_string(),
            reason: format!("must be a single character, got '{}'", glyph),
        });
    }
    Ok(())
}
