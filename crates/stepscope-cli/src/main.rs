use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

mod commands;
mod config;
mod debugger;
mod logging;
mod view;

use commands::{SessionArgs, ViewSettings};
use logging::LogTarget;

/// Step through a recorded program execution and watch the caret move.
///
/// stepscope shows a source file split at an execution caret: text already
/// run, a marker, and text still to run. A trace file drives the caret as
/// frames are pushed and popped; clicks and explicit line/column requests
/// move it by hand.
///
/// EXAMPLES:
///     stepscope debug main.src --trace run.jsonl     Step in a line-editor REPL
///     stepscope view main.src --trace run.jsonl      Full-screen view with mouse
///     stepscope completions bash                     Print shell completions
///
/// ENVIRONMENT VARIABLES:
///     STEPSCOPE_LOG            Log filter directives (default: warn)
///     STEPSCOPE_LOG_FILE       Write logs to this file
///     STEPSCOPE_POP_BEHAVIOR   'retain' or 'resync'
///     STEPSCOPE_CARET_GLYPH    Glyph drawn for the caret marker
///     STEPSCOPE_NO_HISTORY     Set to '1' to disable REPL history
///     NO_COLOR                 Set to disable colored output
#[derive(Parser)]
#[command(name = "stepscope")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Debug a source file in an interactive REPL
    ///
    /// Without a trace the caret can only be moved by hand; `step` and
    /// `continue` then have nothing to run.
    ///
    /// EXAMPLES:
    ///     stepscope debug main.src                     Inspect a file
    ///     stepscope debug main.src -t run.jsonl        Replay a trace
    ///     stepscope debug main.src --resync-on-pop     Follow the caret on pop
    #[command(visible_alias = "d")]
    Debug {
        /// Path to the source file
        file: PathBuf,
        /// Execution trace in JSON Lines format
        #[arg(long, short = 't')]
        trace: Option<PathBuf>,
        /// Move the caret to the new top frame after a pop
        #[arg(long)]
        resync_on_pop: bool,
    },

    /// Open the full-screen source view
    ///
    /// Keys: s step, c continue, r run to line/column, q quit.
    /// Left-click in the source panel moves the caret.
    ///
    /// EXAMPLES:
    ///     stepscope view main.src -t run.jsonl
    #[command(visible_alias = "v")]
    View {
        /// Path to the source file
        file: PathBuf,
        /// Execution trace in JSON Lines format
        #[arg(long, short = 't')]
        trace: Option<PathBuf>,
        /// Move the caret to the new top frame after a pop
        #[arg(long)]
        resync_on_pop: bool,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     stepscope completions bash > ~/.local/share/bash-completion/completions/stepscope
    ///     stepscope completions zsh > ~/.zfunc/_stepscope
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cli_config = config::Config::from_env();

    if cli_config.no_color {
        colored::control::set_override(false);
    }

    let log_target = match (&cli_config.log_file, &cli.command) {
        (Some(path), _) => LogTarget::File(path),
        (None, Commands::View { .. }) => LogTarget::Off,
        (None, _) => LogTarget::Stderr,
    };
    logging::init_tracing(log_target)?;

    match cli.command {
        Commands::Debug {
            file,
            trace,
            resync_on_pop,
        } => {
            let settings = ViewSettings::resolve(&load_viewer_config()?, resync_on_pop);
            let args = SessionArgs { file, trace };
            commands::debug::run(args, settings, &cli_config)?;
        }
        Commands::View {
            file,
            trace,
            resync_on_pop,
        } => {
            let settings = ViewSettings::resolve(&load_viewer_config()?, resync_on_pop);
            let args = SessionArgs { file, trace };
            commands::view::run(args, settings)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}

/// Global and project configuration with environment overrides applied.
///
/// A broken config file is reported and the defaults are used instead.
fn load_viewer_config() -> Result<stepscope_config::Config> {
    let cwd = std::env::current_dir()?;
    match stepscope_config::ConfigLoader::new().load_from_directory(&cwd) {
        Ok(config) => {
            tracing::debug!(project_root = ?config.project_root(), "configuration loaded");
            Ok(config)
        }
        Err(err) => {
            tracing::warn!(error = %err, "ignoring configuration");
            eprintln!("warning: {}; using default settings", err);
            Ok(stepscope_config::Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_smoke() {
        let _cli = Cli::parse_from(["stepscope", "debug", "main.src"]);
    }

    #[test]
    fn test_cli_debug_with_trace() {
        let cli = Cli::parse_from(["stepscope", "debug", "main.src", "--trace", "run.jsonl"]);
        match cli.command {
            Commands::Debug {
                file,
                trace,
                resync_on_pop,
            } => {
                assert_eq!(file, PathBuf::from("main.src"));
                assert_eq!(trace, Some(PathBuf::from("run.jsonl")));
                assert!(!resync_on_pop);
            }
            _ => panic!("Expected Debug command"),
        }
    }

    #[test]
    fn test_cli_debug_alias_and_short_trace() {
        let cli = Cli::parse_from(["stepscope", "d", "main.src", "-t", "run.jsonl"]);
        assert!(matches!(cli.command, Commands::Debug { trace: Some(_), .. }));
    }

    #[test]
    fn test_cli_view_resync_flag() {
        let cli = Cli::parse_from(["stepscope", "view", "main.src", "--resync-on-pop"]);
        match cli.command {
            Commands::View { resync_on_pop, .. } => assert!(resync_on_pop),
            _ => panic!("Expected View command"),
        }
    }

    #[test]
    fn test_cli_debug_requires_file() {
        assert!(Cli::try_parse_from(["stepscope", "debug"]).is_err());
    }

    #[test]
    fn test_completions_bash() {
        let cli = Cli::parse_from(["stepscope", "completions", "bash"]);
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Bash),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_completions_invalid_shell() {
        assert!(Cli::try_parse_from(["stepscope", "completions", "tcsh"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
