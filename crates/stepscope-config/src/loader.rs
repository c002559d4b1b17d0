//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::viewer::{
    validate_caret_glyph, PopBehaviorSetting, ViewConfig, ViewerConfig, DEFAULT_CARET_GLYPH,
    DEFAULT_MAX_NAME_WIDTH,
};
use crate::{ConfigResult, PROJECT_CONFIG_FILE};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.stepscope/config.toml) - lowest priority
/// 2. Project config (./stepscope.toml) - overrides global
/// 3. Environment variables (STEPSCOPE_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Effective viewer configuration after merging all sources
    pub viewer: ViewerConfig,

    /// Directory where stepscope.toml was found
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Use a specific global config file instead of ~/.stepscope/config.toml
    pub fn with_global_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find stepscope.toml, merges it over the
    /// global config, then applies environment overrides.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;
        self.assemble(project_root, project_config)
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ViewerConfig::load_from_file(config_path)?;
        let project_root = config_path.parent().map(|p| p.to_path_buf());
        self.assemble(project_root, Some(project_config))
    }

    fn assemble(
        &mut self,
        project_root: Option<PathBuf>,
        project_config: Option<ViewerConfig>,
    ) -> ConfigResult<Config> {
        let mut viewer = self.load_global_config()?;
        if let Some(project) = &project_config {
            viewer.merge(project);
        }
        let viewer = self.apply_env_overrides(viewer)?;

        Ok(Config {
            viewer,
            project_root,
        })
    }

    /// Find project configuration by walking up directory tree
    ///
    /// Returns (project_root, project_config); both are None when no file exists
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, Option<ViewerConfig>)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_CONFIG_FILE);

            if config_path.exists() {
                let project_config = ViewerConfig::load_from_file(&config_path)?;
                return Ok((Some(current), Some(project_config)));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, None)),
            }
        }
    }

    /// Load global configuration from ~/.stepscope/config.toml
    ///
    /// A missing file or home directory yields the default configuration;
    /// a file that exists but is invalid is an error.
    fn load_global_config(&mut self) -> ConfigResult<ViewerConfig> {
        if self.global_config_path.is_none() {
            match ViewerConfig::global_config_path() {
                Ok(path) => self.global_config_path = Some(path),
                Err(_) => return Ok(ViewerConfig::default()),
            }
        }

        match &self.global_config_path {
            Some(path) if path.exists() => ViewerConfig::load_from_file(path),
            _ => Ok(ViewerConfig::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// - STEPSCOPE_POP_BEHAVIOR=retain|resync
    /// - STEPSCOPE_CARET_GLYPH=<one character>
    fn apply_env_overrides(&self, mut config: ViewerConfig) -> ConfigResult<ViewerConfig> {
        if let Ok(value) = env::var("STEPSCOPE_POP_BEHAVIOR") {
            let behavior: PopBehaviorSetting = value.parse()?;
            config
                .view
                .get_or_insert_with(ViewConfig::default)
                .pop_behavior = Some(behavior);
        }

        if let Ok(glyph) = env::var("STEPSCOPE_CARET_GLYPH") {
            validate_caret_glyph(&glyph)?;
            config
                .view
                .get_or_insert_with(ViewConfig::default)
                .caret_glyph = Some(glyph);
        }

        Ok(config)
    }
}

impl Config {
    /// Effective caret glyph (config > default)
    pub fn caret_glyph(&self) -> char {
        self.viewer.caret_glyph().unwrap_or(DEFAULT_CARET_GLYPH)
    }

    /// Effective pop behaviour (config > default)
    pub fn pop_behavior(&self) -> PopBehaviorSetting {
        self.viewer.pop_behavior().unwrap_or_default()
    }

    /// Effective frame name width (config > default)
    pub fn max_name_width(&self) -> usize {
        self.viewer
            .max_name_width()
            .unwrap_or(DEFAULT_MAX_NAME_WIDTH)
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.caret_glyph(), '|');
        assert_eq!(config.pop_behavior(), PopBehaviorSetting::Retain);
        assert_eq!(config.max_name_width(), 40);
        assert!(config.project_root().is_none());
    }
}
