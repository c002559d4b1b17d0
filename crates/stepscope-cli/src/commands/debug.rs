//! Debug command - line-editor front end for a stepping session

use anyhow::Result;

use super::{display_name, open_session, SessionArgs, ViewSettings};
use crate::config::Config;
use crate::debugger::repl::DebugRepl;

/// Open the session and hand it to the REPL
pub fn run(args: SessionArgs, settings: ViewSettings, config: &Config) -> Result<()> {
    let session = open_session(&args, settings.pop_behavior)?;
    let traced = args.trace.is_some();

    let mut repl = DebugRepl::new(session, display_name(&args.file), settings, traced);
    repl.run(config.get_history_path())?;

    Ok(())
}
