//! View command - full-screen source view with mouse support

use anyhow::Result;

use super::{display_name, open_session, SessionArgs, ViewSettings};
use crate::view::{self, App};

/// Open the session, then hand the terminal to the view
pub fn run(args: SessionArgs, settings: ViewSettings) -> Result<()> {
    let session = open_session(&args, settings.pop_behavior)?;
    let app = App::new(
        session,
        settings,
        display_name(&args.file),
        args.trace.is_some(),
    );
    view::run(app)
}
