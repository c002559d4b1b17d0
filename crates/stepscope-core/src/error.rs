//! Errors raised by the view components.

use thiserror::Error;

/// Errors produced by the caret model, the stack view and the evaluator boundary.
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("caret offset {offset} is outside the source buffer (length {len})")]
    CaretOutOfRange { offset: usize, len: usize },

    #[error("line {line}, column {column} is not inside the source buffer")]
    InvalidPosition { line: u32, column: usize },

    #[error("evaluator returned a malformed position '{0}' (expected \"line,column\")")]
    MalformedPosition(String),

    #[error("pop requested on an empty call stack")]
    EmptyStack,

    #[error("trace line {line}: {message}")]
    Trace { line: usize, message: String },

    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for view operations
pub type ViewResult<T> = Result<T, ViewError>;
