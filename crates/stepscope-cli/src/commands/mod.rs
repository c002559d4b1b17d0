//! Subcommands and the session setup they share

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use stepscope_config::PopBehaviorSetting;
use stepscope_core::{DebugController, Evaluator, PopBehavior, SourceEvaluator, TraceEvaluator};

pub mod debug;
pub mod view;

/// The controller every front end drives.
pub type Session = DebugController<Box<dyn Evaluator>>;

/// Inputs shared by `debug` and `view`
#[derive(Debug, Clone, Default)]
pub struct SessionArgs {
    /// Path to the source file
    pub file: PathBuf,
    /// Optional JSON Lines trace to replay
    pub trace: Option<PathBuf>,
}

/// Effective view settings after config and flags are merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub caret_glyph: char,
    pub pop_behavior: PopBehavior,
    pub max_name_width: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::resolve(&stepscope_config::Config::default(), false)
    }
}

impl ViewSettings {
    /// Merge loaded configuration with command-line flags.
    ///
    /// `--resync-on-pop` can only switch resync on; a config asking for
    /// resync is not overridden by the flag's absence.
    pub fn resolve(config: &stepscope_config::Config, resync_on_pop: bool) -> Self {
        let pop_behavior = if resync_on_pop {
            PopBehavior::Resync
        } else {
            match config.pop_behavior() {
                PopBehaviorSetting::Retain => PopBehavior::Retain,
                PopBehaviorSetting::Resync => PopBehavior::Resync,
            }
        };
        Self {
            caret_glyph: config.caret_glyph(),
            pop_behavior,
            max_name_width: config.max_name_width(),
        }
    }
}

/// Read the source (and trace, when given) and attach a controller to it.
pub fn open_session(args: &SessionArgs, pop_behavior: PopBehavior) -> Result<Session> {
    let source = fs::read_to_string(&args.file).with_context(|| {
        format!("Failed to read source file '{}'", args.file.display())
    })?;

    let evaluator: Box<dyn Evaluator> = match &args.trace {
        Some(trace) => Box::new(
            TraceEvaluator::from_file(source, trace)
                .with_context(|| format!("Failed to load trace '{}'", trace.display()))?,
        ),
        None => Box::new(SourceEvaluator::new(source)),
    };

    tracing::debug!(
        file = %args.file.display(),
        traced = args.trace.is_some(),
        "opening session"
    );

    DebugController::new(evaluator, pop_behavior).context("Failed to attach to the trace")
}

/// File name shown in banners and titles
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
