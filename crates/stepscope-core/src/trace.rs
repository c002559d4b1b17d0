//! Replaying execution engine.
//!
//! A [`TraceEvaluator`] plays back a recorded sequence of frame pushes and
//! pops with the suspension rules of a live step-debugger engine: in step
//! mode execution suspends right after every push, in continue mode it runs
//! to the end.
//!
//! Traces are JSON Lines:
//!
//! ```text
//! # comments and blank lines are skipped
//! {"event":"push","expression":"Statement","offset":20}
//! {"event":"pop"}
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ViewError, ViewResult};
use crate::evaluator::{EngineEvent, Evaluator, SourceEvaluator};

/// One line of a trace file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceRecord {
    Push { expression: String, offset: usize },
    Pop,
}

/// Parse JSON Lines trace text into records.
pub fn parse_trace(text: &str) -> ViewResult<Vec<TraceRecord>> {
    Ok(parse_numbered(text)?
        .into_iter()
        .map(|(_, record)| record)
        .collect())
}

/// Records paired with the 1-based file line they came from.
fn parse_numbered(text: &str) -> ViewResult<Vec<(usize, TraceRecord)>> {
    let mut records = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|e| ViewError::Trace {
            line: index + 1,
            message: e.to_string(),
        })?;
        records.push((index + 1, record));
    }
    Ok(records)
}

// ── TraceEvaluator ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct TraceEvaluator {
    source: SourceEvaluator,
    events: Vec<EngineEvent>,
    cursor: usize,
    step_mode: bool,
    finished: bool,
    pending: Vec<EngineEvent>,
}

impl TraceEvaluator {
    /// Build an engine over `source` and run it to its first suspension
    /// point.
    ///
    /// Every push must point inside the buffer and every pop must have a
    /// matching push. Errors name the 1-based record number.
    pub fn new(source: impl Into<String>, records: Vec<TraceRecord>) -> ViewResult<Self> {
        Self::build(source, records.into_iter().enumerate().map(|(i, r)| (i + 1, r)))
    }

    fn build(
        source: impl Into<String>,
        records: impl IntoIterator<Item = (usize, TraceRecord)>,
    ) -> ViewResult<Self> {
        let source = SourceEvaluator::new(source);
        let len = source.line_map().len();
        let mut depth = 0usize;
        let mut events = Vec::new();

        for (line, record) in records {
            let event = match record {
                TraceRecord::Push { expression, offset } => {
                    if offset > len {
                        return Err(ViewError::Trace {
                            line,
                            message: format!(
                                "offset {} is past the end of the source ({} chars)",
                                offset, len
                            ),
                        });
                    }
                    depth += 1;
                    let (frame_line, column) = source.line_map().position(offset);
                    EngineEvent::PushFrame {
                        expression,
                        line: frame_line,
                        column,
                        offset,
                    }
                }
                TraceRecord::Pop => {
                    depth = depth.checked_sub(1).ok_or_else(|| ViewError::Trace {
                        line,
                        message: "pop without a matching push".to_string(),
                    })?;
                    EngineEvent::PopFrame
                }
            };
            events.push(event);
        }

        let mut engine = Self {
            source,
            events,
            cursor: 0,
            step_mode: true,
            finished: false,
            pending: Vec::new(),
        };
        engine.run();
        Ok(engine)
    }

    /// Build an engine from JSON Lines trace text.
    pub fn from_jsonl(source: impl Into<String>, trace: &str) -> ViewResult<Self> {
        Self::build(source, parse_numbered(trace)?)
    }

    /// Build an engine from a JSON Lines trace file.
    pub fn from_file(source: impl Into<String>, path: &Path) -> ViewResult<Self> {
        let trace = fs::read_to_string(path)?;
        Self::from_jsonl(source, &trace)
    }

    /// Number of recorded events not yet delivered.
    pub fn remaining_events(&self) -> usize {
        self.events.len() - self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Deliver events until the next suspension point or the end of the trace.
    fn run(&mut self) {
        while let Some(event) = self.events.get(self.cursor).cloned() {
            self.cursor += 1;
            let suspends = self.step_mode && matches!(event, EngineEvent::PushFrame { .. });
            self.pending.push(event);
            if suspends {
                debug!(cursor = self.cursor, "engine suspended");
                return;
            }
        }
        if !self.finished {
            debug!("trace exhausted");
            self.finished = true;
            self.pending.push(EngineEvent::Finished);
        }
    }
}

impl Evaluator for TraceEvaluator {
    fn sub_text(&self, start: usize, end: usize) -> String {
        self.source.sub_text(start, end)
    }

    fn sub_text_from(&self, start: usize) -> String {
        self.source.sub_text_from(start)
    }

    fn file_offset(&self, line: u32, column: usize) -> ViewResult<usize> {
        self.source.file_offset(line, column)
    }

    fn line_and_column(&self, offset: usize) -> String {
        self.source.line_and_column(offset)
    }

    fn do_continue(&mut self) {
        if self.finished {
            debug!("continue ignored, trace already finished");
            return;
        }
        self.step_mode = false;
        self.run();
    }

    fn do_step(&mut self) {
        if self.finished {
            debug!("step ignored, trace already finished");
            return;
        }
        self.step_mode = true;
        self.run();
    }

    fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.pending)
    }
}
