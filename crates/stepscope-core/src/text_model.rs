//! Caret ownership and the three-segment rendering of the source buffer.

use tracing::debug;

use crate::click::Segment;
use crate::error::{ViewError, ViewResult};

/// Slice `text` by char offsets `[start, end)`.
///
/// Offsets past the end are clamped, so the result is always a valid
/// (possibly empty) `&str`.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let from = byte_index(text, start);
    let to = byte_index(text, end.max(start));
    &text[from..to]
}

/// Byte index of the char at `offset`, or `text.len()` past the end.
fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

// ── RenderedText ─────────────────────────────────────────────────────────────

/// The source buffer split at the caret.
///
/// The marker sits between `consumed` and `remaining` and has no text of its
/// own; hosts draw it with whatever glyph they like.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedText {
    /// Already-executed text, `buffer[0..caret]`.
    pub consumed: String,
    /// Not-yet-executed text, `buffer[caret..]`.
    pub remaining: String,
    /// Offset the buffer was split at.
    pub caret: usize,
}

impl RenderedText {
    /// Text of one segment. The marker is zero-width.
    pub fn segment_text(&self, segment: Segment) -> &str {
        match segment {
            Segment::Consumed => &self.consumed,
            Segment::Marker => "",
            Segment::Remaining => &self.remaining,
        }
    }

    /// Absolute offset at which a segment starts.
    pub fn segment_start(&self, segment: Segment) -> usize {
        match segment {
            Segment::Consumed => 0,
            Segment::Marker | Segment::Remaining => self.caret,
        }
    }
}

// ── TextOffsetModel ──────────────────────────────────────────────────────────

/// Owns the caret and republishes the rendering whenever it moves.
#[derive(Debug, Clone)]
pub struct TextOffsetModel {
    source: String,
    len: usize,
    caret: usize,
    rendered: RenderedText,
}

impl TextOffsetModel {
    /// Create a model with the caret at the start of `source`.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let len = source.chars().count();
        let rendered = RenderedText {
            consumed: String::new(),
            remaining: source.clone(),
            caret: 0,
        };
        Self {
            source,
            len,
            caret: 0,
            rendered,
        }
    }

    /// Move the caret and re-render.
    ///
    /// Fails without touching any state when `position` is past the end of
    /// the buffer.
    pub fn set_caret(&mut self, position: usize) -> ViewResult<()> {
        if position > self.len {
            return Err(ViewError::CaretOutOfRange {
                offset: position,
                len: self.len,
            });
        }
        self.rendered = RenderedText {
            consumed: char_slice(&self.source, 0, position).to_string(),
            remaining: char_slice(&self.source, position, self.len).to_string(),
            caret: position,
        };
        debug!(from = self.caret, to = position, "caret moved");
        self.caret = position;
        Ok(())
    }

    /// The last position passed to a successful [`set_caret`](Self::set_caret).
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn rendered(&self) -> &RenderedText {
        &self.rendered
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Buffer length in chars.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_model_starts_at_zero() {
        let model = TextOffsetModel::new("abc");
        assert_eq!(model.caret(), 0);
        assert_eq!(model.rendered().consumed, "");
        assert_eq!(model.rendered().remaining, "abc");
    }

    #[test]
    fn test_set_caret_splits_buffer() {
        let mut model = TextOffsetModel::new("hello world");
        model.set_caret(5).unwrap();
        assert_eq!(model.rendered().consumed, "hello");
        assert_eq!(model.rendered().remaining, " world");
        assert_eq!(model.caret(), 5);
    }

    #[test]
    fn test_set_caret_at_end() {
        let mut model = TextOffsetModel::new("abc");
        model.set_caret(3).unwrap();
        assert_eq!(model.rendered().consumed, "abc");
        assert_eq!(model.rendered().remaining, "");
    }

    #[test]
    fn test_out_of_range_caret_is_rejected() {
        let mut model = TextOffsetModel::new("abc");
        model.set_caret(2).unwrap();
        let err = model.set_caret(4).unwrap_err();
        assert!(matches!(err, ViewError::CaretOutOfRange { offset: 4, len: 3 }));
        assert_eq!(model.caret(), 2);
        assert_eq!(model.rendered().consumed, "ab");
    }

    #[test]
    fn test_multibyte_split() {
        let mut model = TextOffsetModel::new("añb");
        model.set_caret(2).unwrap();
        assert_eq!(model.rendered().consumed, "añ");
        assert_eq!(model.rendered().remaining, "b");
    }

    #[test]
    fn test_char_slice_clamps() {
        assert_eq!(char_slice("abc", 1, 10), "bc");
        assert_eq!(char_slice("abc", 5, 10), "");
        assert_eq!(char_slice("abc", 2, 1), "");
    }

    #[test]
    fn test_segment_start() {
        let mut model = TextOffsetModel::new("abcdef");
        model.set_caret(4).unwrap();
        let rendered = model.rendered();
        assert_eq!(rendered.segment_start(Segment::Consumed), 0);
        assert_eq!(rendered.segment_start(Segment::Marker), 4);
        assert_eq!(rendered.segment_start(Segment::Remaining), 4);
        assert_eq!(rendered.segment_text(Segment::Marker), "");
    }
}
