//! Composition root of the view.
//!
//! [`DebugController`] owns the evaluator and the three view components. User
//! actions come in through the `on_*` handlers; evaluator notifications come
//! in through [`DebugController::apply_event`], either directly from a host or
//! drained from the evaluator after a step or continue request.

use tracing::{debug, warn};

use crate::call_stack::{active_frame_position, CallStackView, StackFrame};
use crate::click::{resolve_click, ClickEvent};
use crate::error::{ViewError, ViewResult};
use crate::evaluator::{EngineEvent, Evaluator};
use crate::position::{PositionFields, PositionInputSync};
use crate::text_model::{RenderedText, TextOffsetModel};

/// What happens to the caret when a frame is popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopBehavior {
    /// Caret and fields stay where the popped frame left them.
    #[default]
    Retain,
    /// Caret and fields jump to the frame that becomes active. Nothing moves
    /// when the stack becomes empty.
    Resync,
}

// ── DebugController ──────────────────────────────────────────────────────────

pub struct DebugController<E: Evaluator> {
    evaluator: E,
    model: TextOffsetModel,
    position: PositionInputSync,
    stack: CallStackView,
    pop_behavior: PopBehavior,
    finished: bool,
}

impl<E: Evaluator> DebugController<E> {
    /// Attach to an evaluator.
    ///
    /// The source buffer is read from the evaluator, the caret starts at 0,
    /// and any events the evaluator already queued (an engine that ran to its
    /// first suspension point) are applied before returning.
    pub fn new(evaluator: E, pop_behavior: PopBehavior) -> ViewResult<Self> {
        let model = TextOffsetModel::new(evaluator.sub_text_from(0));
        let mut controller = Self {
            evaluator,
            model,
            position: PositionInputSync::new(),
            stack: CallStackView::new(),
            pop_behavior,
            finished: false,
        };
        controller
            .position
            .on_offset_changed(&controller.evaluator, 0)?;
        controller.drain_engine()?;
        Ok(controller)
    }

    // ── User actions ─────────────────────────────────────────────────────────

    /// Move the caret to where the user clicked.
    pub fn on_text_click(&mut self, event: ClickEvent) -> ViewResult<usize> {
        let offset = resolve_click(self.model.caret(), event);
        self.move_caret(offset)?;
        Ok(offset)
    }

    /// Move the caret to a user-entered line/column.
    ///
    /// Rejected positions change nothing; the error carries the message for
    /// the user.
    pub fn on_run_requested(&mut self, line: u32, column: usize) -> ViewResult<usize> {
        self.position
            .on_run_requested(&self.evaluator, &mut self.model, line, column)
    }

    pub fn on_continue(&mut self) -> ViewResult<()> {
        debug!(finished = self.finished, "continue requested");
        self.evaluator.do_continue();
        self.drain_engine()
    }

    pub fn on_step(&mut self) -> ViewResult<()> {
        debug!(finished = self.finished, "step requested");
        self.evaluator.do_step();
        self.drain_engine()
    }

    // ── Evaluator notifications ──────────────────────────────────────────────

    /// Push a frame and make it the visible execution point.
    pub fn push_frame(
        &mut self,
        expression: impl Into<String>,
        line: u32,
        column: usize,
        offset: usize,
    ) -> ViewResult<()> {
        if offset > self.model.len() {
            return Err(ViewError::CaretOutOfRange {
                offset,
                len: self.model.len(),
            });
        }
        self.stack
            .push_frame(StackFrame::new(expression, line, column, offset));
        self.sync_to_active_frame()
    }

    /// Pop the active frame. See [`PopBehavior`] for what the caret does.
    pub fn pop_frame(&mut self) -> ViewResult<StackFrame> {
        let frame = self.stack.pop_frame()?;
        if self.pop_behavior == PopBehavior::Resync {
            self.sync_to_active_frame()?;
        }
        Ok(frame)
    }

    pub fn apply_event(&mut self, event: EngineEvent) -> ViewResult<()> {
        match event {
            EngineEvent::PushFrame {
                expression,
                line,
                column,
                offset,
            } => self.push_frame(expression, line, column, offset),
            EngineEvent::PopFrame => self.pop_frame().map(|_| ()),
            EngineEvent::Finished => {
                debug!(depth = self.stack.depth(), "engine finished");
                self.finished = true;
                Ok(())
            }
        }
    }

    /// Apply every queued evaluator event in order.
    ///
    /// A failing event does not stop the rest from being applied; the first
    /// failure is returned.
    fn drain_engine(&mut self) -> ViewResult<()> {
        let mut first_error = None;
        for event in self.evaluator.drain_events() {
            if let Err(err) = self.apply_event(event) {
                warn!(%err, "engine event rejected");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn move_caret(&mut self, offset: usize) -> ViewResult<()> {
        let fields = PositionInputSync::resolve(&self.evaluator, offset)?;
        self.model.set_caret(offset)?;
        self.position.set(fields.line, fields.column);
        Ok(())
    }

    fn sync_to_active_frame(&mut self) -> ViewResult<()> {
        if let Some(active) = active_frame_position(self.stack.frames()) {
            self.model.set_caret(active.offset)?;
            self.position.set(active.line, active.column);
        }
        Ok(())
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn caret(&self) -> usize {
        self.model.caret()
    }

    pub fn rendered(&self) -> &RenderedText {
        self.model.rendered()
    }

    pub fn position(&self) -> PositionFields {
        self.position.fields()
    }

    pub fn frames(&self) -> &[StackFrame] {
        self.stack.frames()
    }

    pub fn active_frame(&self) -> Option<&StackFrame> {
        self.stack.active_frame()
    }

    pub fn source(&self) -> &str {
        self.model.source()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn pop_behavior(&self) -> PopBehavior {
        self.pop_behavior
    }

    pub fn set_pop_behavior(&mut self, pop_behavior: PopBehavior) {
        self.pop_behavior = pop_behavior;
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}
