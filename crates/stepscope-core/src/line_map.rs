//! Offset ⇄ line/column index over a source buffer.
//!
//! Lines start at 1; offsets and columns start at 0. All quantities are
//! counted in chars, so a column is the number of chars between the start
//! of the line and the position.

// ── LineMap ──────────────────────────────────────────────────────────────────

/// Maps line numbers to their starting offset and back in O(log lines).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMap {
    /// Char offset at which each line starts. `line_starts[0]` is always 0.
    line_starts: Vec<usize>,
    /// Total length of the buffer in chars.
    len: usize,
}

impl LineMap {
    /// Index the given text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut len = 0;
        for ch in text.chars() {
            len += 1;
            if ch == '\n' {
                line_starts.push(len);
            }
        }
        Self { line_starts, len }
    }

    /// Length of the indexed text in chars.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the indexed text is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of lines. An empty buffer still has one (empty) line.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Translate an offset into `(line, column)`.
    ///
    /// Offsets past the end are clamped to the end of the buffer.
    pub fn position(&self, offset: usize) -> (u32, usize) {
        let offset = offset.min(self.len);
        let index = self.line_starts.partition_point(|&start| start <= offset) - 1;
        ((index + 1) as u32, offset - self.line_starts[index])
    }

    /// Translate `(line, column)` into an absolute offset.
    ///
    /// The column may address the end of the line (its newline, or the end
    /// of the buffer on the last line) but not beyond it.
    pub fn file_offset(&self, line: u32, column: usize) -> Option<usize> {
        let start = self.line_start(line)?;
        let end = self.line_end(line)?;
        let offset = start.checked_add(column)?;
        (offset <= end).then_some(offset)
    }

    /// Offset of the first char of `line`.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        let index = (line as usize).checked_sub(1)?;
        self.line_starts.get(index).copied()
    }

    /// Offset just past the last visible char of `line` (its newline, or the
    /// end of the buffer on the last line).
    pub fn line_end(&self, line: u32) -> Option<usize> {
        let index = (line as usize).checked_sub(1)?;
        if index >= self.line_starts.len() {
            return None;
        }
        Some(
            self.line_starts
                .get(index + 1)
                .map(|next| next - 1)
                .unwrap_or(self.len),
        )
    }
}
