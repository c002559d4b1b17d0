//! Click resolution.
//!
//! The rendering layer reports which segment a click landed in and the offset
//! inside that segment's own text. Resolving it against the caret the
//! rendering was produced for gives one absolute buffer offset.

use tracing::trace;

/// One of the three regions of the rendered buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Text before the caret.
    Consumed,
    /// The zero-width caret marker.
    Marker,
    /// Text from the caret to the end of the buffer.
    Remaining,
}

/// A click as reported by the event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub segment: Segment,
    /// Offset inside the segment's text. Ignored for [`Segment::Marker`].
    pub inner_offset: usize,
}

impl ClickEvent {
    pub fn new(segment: Segment, inner_offset: usize) -> Self {
        Self {
            segment,
            inner_offset,
        }
    }

    /// A click on the caret marker.
    pub fn marker() -> Self {
        Self::new(Segment::Marker, 0)
    }
}

/// Resolve a click to an absolute offset.
///
/// `last_caret` is the caret the clicked rendering was produced for. The
/// segment identity alone picks the case; the inner offset is trusted to lie
/// within the segment.
pub fn resolve_click(last_caret: usize, event: ClickEvent) -> usize {
    let resolved = match event.segment {
        Segment::Marker => last_caret,
        Segment::Consumed => event.inner_offset,
        Segment::Remaining => last_caret + event.inner_offset,
    };
    trace!(?event, last_caret, resolved, "click resolved");
    resolved
}
