//! stepscope core - caret, click and call-stack state for a step-debugger view
//!
//! This library holds the state behind a debugger's source view:
//! - the source buffer split at an execution caret ([`TextOffsetModel`])
//! - resolution of clicks on the rendered text into offsets ([`resolve_click`])
//! - line/column fields kept in step with the caret ([`PositionInputSync`])
//! - a mirror of the engine's call stack ([`CallStackView`])
//! - a controller wiring user actions and engine events together
//!   ([`DebugController`])
//!
//! Execution and position arithmetic belong to an [`Evaluator`]. Two are
//! bundled: [`SourceEvaluator`] for a bare buffer and [`TraceEvaluator`] for
//! replaying a recorded execution.
//!
//! # Example
//!
//! ```
//! use stepscope_core::{ClickEvent, DebugController, PopBehavior, Segment, SourceEvaluator};
//!
//! let evaluator = SourceEvaluator::new("let x = 1;\nlet y = x;");
//! let mut controller = DebugController::new(evaluator, PopBehavior::Retain).unwrap();
//!
//! controller.push_frame("Statement", 2, 0, 11).unwrap();
//! assert_eq!(controller.rendered().consumed, "let x = 1;\n");
//!
//! controller.on_text_click(ClickEvent::new(Segment::Remaining, 4)).unwrap();
//! assert_eq!(controller.caret(), 15);
//! assert_eq!(controller.position().column, 4);
//! ```

/// stepscope version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod call_stack;
pub mod click;
pub mod controller;
pub mod error;
pub mod evaluator;
pub mod line_map;
pub mod position;
pub mod text_model;
pub mod trace;

pub use call_stack::{active_frame_position, CallStackView, FramePosition, StackFrame};
pub use click::{resolve_click, ClickEvent, Segment};
pub use controller::{DebugController, PopBehavior};
pub use error::{ViewError, ViewResult};
pub use evaluator::{
    format_line_column, parse_line_column, EngineEvent, Evaluator, SourceEvaluator,
};
pub use line_map::LineMap;
pub use position::{PositionFields, PositionInputSync};
pub use text_model::{char_slice, RenderedText, TextOffsetModel};
pub use trace::{parse_trace, TraceEvaluator, TraceRecord};
