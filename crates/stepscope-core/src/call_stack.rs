//! Visual mirror of the evaluator's call stack.

use tracing::{debug, warn};

use crate::error::{ViewError, ViewResult};

// ── StackFrame ───────────────────────────────────────────────────────────────

/// One entry of the call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Name of the expression being evaluated.
    pub expression: String,
    pub line: u32,
    pub column: usize,
    pub offset: usize,
}

impl StackFrame {
    pub fn new(expression: impl Into<String>, line: u32, column: usize, offset: usize) -> Self {
        Self {
            expression: expression.into(),
            line,
            column,
            offset,
        }
    }

    pub fn position(&self) -> FramePosition {
        FramePosition {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    /// The expression name cut to at most `max_width` chars, ending in `…`
    /// when shortened.
    pub fn display_name(&self, max_width: usize) -> String {
        if self.expression.chars().count() <= max_width {
            return self.expression.clone();
        }
        let kept: String = self
            .expression
            .chars()
            .take(max_width.saturating_sub(1))
            .collect();
        format!("{kept}…")
    }
}

/// Where a frame points into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePosition {
    pub line: u32,
    pub column: usize,
    pub offset: usize,
}

/// Position of the active (topmost) frame, if any.
pub fn active_frame_position(stack: &[StackFrame]) -> Option<FramePosition> {
    stack.last().map(StackFrame::position)
}

// ── CallStackView ────────────────────────────────────────────────────────────

/// Ordered frames, oldest first. The last frame is the active one.
#[derive(Debug, Clone, Default)]
pub struct CallStackView {
    frames: Vec<StackFrame>,
}

impl CallStackView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame; it becomes the active frame.
    pub fn push_frame(&mut self, frame: StackFrame) {
        debug!(
            expression = %frame.expression,
            line = frame.line,
            column = frame.column,
            depth = self.frames.len() + 1,
            "frame pushed"
        );
        self.frames.push(frame);
    }

    /// Remove the most recently pushed frame.
    ///
    /// Popping an empty stack means the evaluator is out of sync with the
    /// view; it is reported and nothing changes.
    pub fn pop_frame(&mut self) -> ViewResult<StackFrame> {
        match self.frames.pop() {
            Some(frame) => {
                debug!(
                    expression = %frame.expression,
                    depth = self.frames.len(),
                    "frame popped"
                );
                Ok(frame)
            }
            None => {
                warn!("pop on empty call stack ignored");
                Err(ViewError::EmptyStack)
            }
        }
    }

    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn active_frame(&self) -> Option<&StackFrame> {
        self.frames.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_makes_frame_active() {
        let mut stack = CallStackView::new();
        stack.push_frame(StackFrame::new("foo", 3, 5, 20));
        stack.push_frame(StackFrame::new("bar", 4, 1, 25));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.active_frame().unwrap().expression, "bar");
    }

    #[test]
    fn test_pop_is_lifo() {
        let mut stack = CallStackView::new();
        stack.push_frame(StackFrame::new("foo", 3, 5, 20));
        stack.push_frame(StackFrame::new("bar", 4, 1, 25));
        let popped = stack.pop_frame().unwrap();
        assert_eq!(popped.expression, "bar");
        assert_eq!(stack.active_frame().unwrap().expression, "foo");
    }

    #[test]
    fn test_pop_empty_is_an_error() {
        let mut stack = CallStackView::new();
        assert!(matches!(stack.pop_frame(), Err(ViewError::EmptyStack)));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_active_frame_position() {
        assert_eq!(active_frame_position(&[]), None);
        let frames = vec![
            StackFrame::new("foo", 3, 5, 20),
            StackFrame::new("bar", 4, 1, 25),
        ];
        assert_eq!(
            active_frame_position(&frames),
            Some(FramePosition {
                line: 4,
                column: 1,
                offset: 25
            })
        );
    }

    #[test]
    fn test_display_name_truncates() {
        let frame = StackFrame::new("VeryLongExpressionName", 1, 0, 0);
        assert_eq!(frame.display_name(40), "VeryLongExpressionName");
        assert_eq!(frame.display_name(8), "VeryLon…");
        assert_eq!(frame.display_name(22), "VeryLongExpressionName");
    }
}
