//! The evaluator boundary.
//!
//! The evaluator owns the source buffer, line/column indexing and execution.
//! The view only ever talks to it through [`Evaluator`], so a test double or
//! a replayed trace can stand in for a live engine.

use tracing::debug;

use crate::error::{ViewError, ViewResult};
use crate::line_map::LineMap;
use crate::text_model::char_slice;

// ── EngineEvent ──────────────────────────────────────────────────────────────

/// A notification from the execution engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A frame was entered and execution is positioned at its start.
    PushFrame {
        expression: String,
        line: u32,
        column: usize,
        offset: usize,
    },
    /// The most recently entered frame returned.
    PopFrame,
    /// Execution ran to completion.
    Finished,
}

// ── Evaluator ────────────────────────────────────────────────────────────────

/// Collaborator that owns execution and position arithmetic.
pub trait Evaluator {
    /// Buffer slice `[start, end)`.
    ///
    /// The controller reads the whole buffer once through
    /// [`sub_text_from`](Self::sub_text_from) when it attaches and splits
    /// its own copy afterwards, so every rendering agrees with these slices.
    /// Hosts call this for excerpts of the buffer.
    fn sub_text(&self, start: usize, end: usize) -> String;

    /// Buffer slice from `start` to the end.
    fn sub_text_from(&self, start: usize) -> String;

    /// Translate a line/column pair into an absolute offset.
    fn file_offset(&self, line: u32, column: usize) -> ViewResult<usize>;

    /// Translate an offset into `"line,column"`.
    fn line_and_column(&self, offset: usize) -> String;

    /// Resume without suspending at further frames.
    fn do_continue(&mut self);

    /// Resume until the next frame is entered.
    fn do_step(&mut self);

    /// Events produced since the last call, oldest first.
    fn drain_events(&mut self) -> Vec<EngineEvent> {
        Vec::new()
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn sub_text(&self, start: usize, end: usize) -> String {
        (**self).sub_text(start, end)
    }

    fn sub_text_from(&self, start: usize) -> String {
        (**self).sub_text_from(start)
    }

    fn file_offset(&self, line: u32, column: usize) -> ViewResult<usize> {
        (**self).file_offset(line, column)
    }

    fn line_and_column(&self, offset: usize) -> String {
        (**self).line_and_column(offset)
    }

    fn do_continue(&mut self) {
        (**self).do_continue()
    }

    fn do_step(&mut self) {
        (**self).do_step()
    }

    fn drain_events(&mut self) -> Vec<EngineEvent> {
        (**self).drain_events()
    }
}

/// Encode a position the way evaluators report it.
pub fn format_line_column(line: u32, column: usize) -> String {
    format!("{},{}", line, column)
}

/// Decode a `"line,column"` pair.
pub fn parse_line_column(encoded: &str) -> ViewResult<(u32, usize)> {
    let malformed = || ViewError::MalformedPosition(encoded.to_string());
    let (line, column) = encoded.split_once(',').ok_or_else(malformed)?;
    let line = line.trim().parse().map_err(|_| malformed())?;
    let column = column.trim().parse().map_err(|_| malformed())?;
    Ok((line, column))
}

// ── SourceEvaluator ──────────────────────────────────────────────────────────

/// An evaluator over a plain source buffer with no execution engine behind it.
///
/// Position queries are answered from a [`LineMap`]; step and continue
/// requests are accepted and produce no events.
#[derive(Debug, Clone)]
pub struct SourceEvaluator {
    text: String,
    lines: LineMap,
}

impl SourceEvaluator {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = LineMap::new(&text);
        Self { text, lines }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_map(&self) -> &LineMap {
        &self.lines
    }
}

impl Evaluator for SourceEvaluator {
    fn sub_text(&self, start: usize, end: usize) -> String {
        char_slice(&self.text, start, end).to_string()
    }

    fn sub_text_from(&self, start: usize) -> String {
        char_slice(&self.text, start, self.lines.len()).to_string()
    }

    fn file_offset(&self, line: u32, column: usize) -> ViewResult<usize> {
        self.lines
            .file_offset(line, column)
            .ok_or(ViewError::InvalidPosition { line, column })
    }

    fn line_and_column(&self, offset: usize) -> String {
        let (line, column) = self.lines.position(offset);
        format_line_column(line, column)
    }

    fn do_continue(&mut self) {
        debug!("continue requested with no engine attached");
    }

    fn do_step(&mut self) {
        debug!("step requested with no engine attached");
    }
}
