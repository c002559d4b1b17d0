//! Line/column fields kept in step with the caret.

use std::fmt;

use tracing::{debug, warn};

use crate::error::ViewResult;
use crate::evaluator::{parse_line_column, Evaluator};
use crate::text_model::TextOffsetModel;

/// The line and column shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionFields {
    pub line: u32,
    pub column: usize,
}

impl PositionFields {
    pub fn new(line: u32, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for PositionFields {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl fmt::Display for PositionFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Two-way glue between [`PositionFields`] and the caret.
///
/// Both directions go through the evaluator; this type never does position
/// arithmetic itself.
#[derive(Debug, Clone, Default)]
pub struct PositionInputSync {
    fields: PositionFields,
}

impl PositionInputSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> PositionFields {
        self.fields
    }

    /// Overwrite both fields.
    pub fn set(&mut self, line: u32, column: usize) {
        self.fields = PositionFields::new(line, column);
    }

    /// Move the caret to a user-entered line/column.
    ///
    /// A position the evaluator rejects leaves the caret and both fields
    /// where they were.
    pub fn on_run_requested<E: Evaluator + ?Sized>(
        &mut self,
        evaluator: &E,
        model: &mut TextOffsetModel,
        line: u32,
        column: usize,
    ) -> ViewResult<usize> {
        let offset = evaluator.file_offset(line, column).map_err(|err| {
            debug!(line, column, %err, "run-to request rejected");
            err
        })?;
        let fields = Self::resolve(evaluator, offset)?;
        model.set_caret(offset)?;
        self.fields = fields;
        debug!(line, column, offset, "ran to position");
        Ok(offset)
    }

    /// Refresh both fields from the evaluator's view of `offset`.
    pub fn on_offset_changed<E: Evaluator + ?Sized>(
        &mut self,
        evaluator: &E,
        offset: usize,
    ) -> ViewResult<PositionFields> {
        self.fields = Self::resolve(evaluator, offset)?;
        Ok(self.fields)
    }

    /// The fields the evaluator reports for `offset`, without applying them.
    pub fn resolve<E: Evaluator + ?Sized>(
        evaluator: &E,
        offset: usize,
    ) -> ViewResult<PositionFields> {
        let encoded = evaluator.line_and_column(offset);
        let (line, column) = parse_line_column(&encoded).map_err(|err| {
            warn!(offset, %encoded, "evaluator returned a malformed position");
            err
        })?;
        Ok(PositionFields::new(line, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewError;
    use crate::evaluator::SourceEvaluator;

    #[test]
    fn test_default_fields() {
        let sync = PositionInputSync::new();
        assert_eq!(sync.fields(), PositionFields::new(1, 0));
    }

    #[test]
    fn test_run_requested_moves_caret() {
        let eval = SourceEvaluator::new("first\nsecond\nthird");
        let mut model = TextOffsetModel::new(eval.text());
        let mut sync = PositionInputSync::new();

        let offset = sync.on_run_requested(&eval, &mut model, 2, 3).unwrap();
        assert_eq!(offset, 9);
        assert_eq!(model.caret(), 9);
        assert_eq!(sync.fields(), PositionFields::new(2, 3));
        assert_eq!(model.rendered().remaining, "ond\nthird");
    }

    #[test]
    fn test_invalid_run_request_keeps_caret() {
        let eval = SourceEvaluator::new("first\nsecond");
        let mut model = TextOffsetModel::new(eval.text());
        model.set_caret(4).unwrap();
        let mut sync = PositionInputSync::new();
        sync.set(1, 4);

        let err = sync.on_run_requested(&eval, &mut model, 9, 0).unwrap_err();
        assert!(matches!(err, ViewError::InvalidPosition { line: 9, column: 0 }));
        assert_eq!(model.caret(), 4);
        assert_eq!(sync.fields(), PositionFields::new(1, 4));
    }

    #[test]
    fn test_offset_changed_updates_fields() {
        let eval = SourceEvaluator::new("ab\ncd\nef");
        let mut sync = PositionInputSync::new();
        let fields = sync.on_offset_changed(&eval, 7).unwrap();
        assert_eq!(fields, PositionFields::new(3, 1));
        assert_eq!(sync.fields(), fields);
    }

    #[test]
    fn test_display() {
        assert_eq!(PositionFields::new(4, 1).to_string(), "4:1");
    }
}
