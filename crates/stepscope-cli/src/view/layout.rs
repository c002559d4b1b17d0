//! Screen layout of the split source buffer
//!
//! The same layout is used to draw the source panel and to turn a mouse
//! position back into a [`ClickEvent`], so what the user clicks is exactly
//! what was drawn.

use stepscope_core::{ClickEvent, RenderedText, Segment};
use unicode_width::UnicodeWidthChar;

/// Which part of the rendering a cell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Consumed,
    Marker,
    Remaining,
}

/// One drawn character and the number of terminal columns it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub kind: CellKind,
    pub event: ClickEvent,
    pub width: usize,
}

/// One screen row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
    /// Click target of each terminal column; wide chars repeat theirs
    columns: Vec<ClickEvent>,
    /// What a click past the last column resolves to
    pub end: ClickEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    rows: Vec<Row>,
    caret_row: usize,
}

impl SourceLayout {
    /// Lay out `consumed`, the marker glyph and `remaining`.
    ///
    /// Newlines end a row and are not drawn. Tabs and other control
    /// characters take one blank cell. Wide chars take as many columns as
    /// the terminal draws them with; zero-width chars take none.
    pub fn new(rendered: &RenderedText, glyph: char) -> Self {
        let mut builder = Builder::default();

        for (index, ch) in rendered.consumed.chars().enumerate() {
            builder.push(ch, CellKind::Consumed, ClickEvent::new(Segment::Consumed, index));
        }

        let caret_row = builder.rows.len();
        builder.push(glyph, CellKind::Marker, ClickEvent::marker());

        let mut remaining_len = 0;
        for (index, ch) in rendered.remaining.chars().enumerate() {
            builder.push(ch, CellKind::Remaining, ClickEvent::new(Segment::Remaining, index));
            remaining_len = index + 1;
        }

        let rows = builder.finish(ClickEvent::new(Segment::Remaining, remaining_len));
        Self { rows, caret_row }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row holding the marker
    pub fn caret_row(&self) -> usize {
        self.caret_row
    }

    /// Resolve a terminal position (row, column) to a click.
    ///
    /// Past the end of a row resolves to that row's end; below the last row
    /// resolves to the end of the buffer.
    pub fn hit_test(&self, row: usize, column: usize) -> ClickEvent {
        match self.rows.get(row) {
            Some(line) => line.columns.get(column).copied().unwrap_or(line.end),
            None => self
                .rows
                .last()
                .map(|line| line.end)
                .unwrap_or_else(ClickEvent::marker),
        }
    }
}

#[derive(Default)]
struct Builder {
    rows: Vec<Row>,
    cells: Vec<Cell>,
    columns: Vec<ClickEvent>,
}

impl Builder {
    fn push(&mut self, ch: char, kind: CellKind, event: ClickEvent) {
        if ch == '\n' && kind != CellKind::Marker {
            self.end_row(event);
            return;
        }
        let ch = if ch.is_control() { ' ' } else { ch };
        let mut width = ch.width().unwrap_or(0);
        if kind == CellKind::Marker {
            width = width.max(1);
        }
        self.columns.extend(std::iter::repeat(event).take(width));
        self.cells.push(Cell {
            ch,
            kind,
            event,
            width,
        });
    }

    fn end_row(&mut self, end: ClickEvent) {
        self.rows.push(Row {
            cells: std::mem::take(&mut self.cells),
            columns: std::mem::take(&mut self.columns),
            end,
        });
    }

    fn finish(mut self, end: ClickEvent) -> Vec<Row> {
        self.end_row(end);
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stepscope_core::{resolve_click, TextOffsetModel};

    fn layout_at(source: &str, caret: usize) -> (SourceLayout, usize) {
        let mut model = TextOffsetModel::new(source);
        model.set_caret(caret).unwrap();
        (SourceLayout::new(model.rendered(), '|'), caret)
    }

    fn row_text(row: &Row) -> String {
        row.cells.iter().map(|cell| cell.ch).collect()
    }

    #[test]
    fn test_rows_follow_newlines() {
        let (layout, _) = layout_at("ab\ncd\n", 4);
        let rows: Vec<String> = layout.rows().iter().map(row_text).collect();
        assert_eq!(rows, vec!["ab", "c|d", ""]);
        assert_eq!(layout.caret_row(), 1);
    }

    #[test]
    fn test_layout_snapshot() {
        let (layout, _) = layout_at("fn main() {\n    call();\n}", 16);
        let text = layout
            .rows()
            .iter()
            .map(row_text)
            .collect::<Vec<_>>()
            .join("\n");
        insta::assert_snapshot!(text, @r"
        fn main() {
            |call();
        }
        ");
    }

    #[test]
    fn test_marker_at_start_and_end() {
        let (start, _) = layout_at("xy", 0);
        assert_eq!(row_text(&start.rows()[0]), "|xy");

        let (end, _) = layout_at("xy", 2);
        assert_eq!(row_text(&end.rows()[0]), "xy|");
    }

    #[test]
    fn test_hit_test_cells() {
        let source = "let a = 1;\nlet b = f(a);\n";
        let (layout, caret) = layout_at(source, 15);

        // Row 1 is "let |b = f(a);"
        assert_eq!(layout.hit_test(1, 4), ClickEvent::marker());
        assert_eq!(resolve_click(caret, layout.hit_test(1, 1)), 12);
        assert_eq!(resolve_click(caret, layout.hit_test(1, 5)), 15);
        assert_eq!(resolve_click(caret, layout.hit_test(1, 6)), 16);
        assert_eq!(resolve_click(caret, layout.hit_test(0, 2)), 2);
    }

    #[test]
    fn test_hit_test_past_row_end() {
        let source = "let a = 1;\nlet b = f(a);\n";
        let (layout, caret) = layout_at(source, 15);

        // Consumed row: resolves to its newline
        assert_eq!(resolve_click(caret, layout.hit_test(0, 40)), 10);
        // Row with the marker: resolves to its newline in the remaining text
        assert_eq!(resolve_click(caret, layout.hit_test(1, 40)), 24);
        // Below everything: end of buffer
        assert_eq!(resolve_click(caret, layout.hit_test(9, 0)), 25);
    }

    #[test]
    fn test_every_cell_resolves_to_its_own_offset() {
        let source = "fn main() {\n\tcall();\n}\n";
        for caret in 0..=source.chars().count() {
            let (layout, _) = layout_at(source, caret);
            let mut offsets = Vec::new();
            for (r, row) in layout.rows().iter().enumerate() {
                for (c, cell) in row.cells.iter().enumerate() {
                    if cell.kind != CellKind::Marker {
                        offsets.push(resolve_click(caret, layout.hit_test(r, c)));
                    }
                }
            }
            let expected: Vec<usize> = source
                .chars()
                .enumerate()
                .filter(|(_, ch)| *ch != '\n')
                .map(|(i, _)| i)
                .collect();
            assert_eq!(offsets, expected, "caret at {}", caret);
        }
    }

    #[test]
    fn test_wide_chars_cover_two_columns() {
        let (layout, caret) = layout_at("日本x", 0);
        let row = &layout.rows()[0];
        assert_eq!(row_text(row), "|日本x");
        assert_eq!(row.cells[1].width, 2);

        // "|" at 0, "日" at 1-2, "本" at 3-4, "x" at 5
        let offsets: Vec<usize> = (1..=6)
            .map(|column| resolve_click(caret, layout.hit_test(0, column)))
            .collect();
        assert_eq!(offsets, vec![0, 0, 1, 1, 2, 3]);
    }

    #[test]
    fn test_wide_chars_in_consumed_text() {
        let (layout, caret) = layout_at("日本x", 2);
        assert_eq!(row_text(&layout.rows()[0]), "日本|x");
        assert_eq!(layout.hit_test(0, 4), ClickEvent::marker());
        assert_eq!(resolve_click(caret, layout.hit_test(0, 3)), 1);
        assert_eq!(resolve_click(caret, layout.hit_test(0, 5)), 2);
    }

    #[test]
    fn test_zero_width_chars_take_no_column() {
        // "e" followed by a combining acute accent
        let (layout, caret) = layout_at("e\u{301}z", 3);
        assert_eq!(layout.rows()[0].cells.len(), 4);
        assert_eq!(resolve_click(caret, layout.hit_test(0, 1)), 2);
        assert_eq!(layout.hit_test(0, 2), ClickEvent::marker());
    }

    #[test]
    fn test_control_chars_draw_blank() {
        let (layout, _) = layout_at("\tx", 2);
        assert_eq!(row_text(&layout.rows()[0]), " x|");
    }

    #[test]
    fn test_empty_buffer() {
        let (layout, _) = layout_at("", 0);
        assert_eq!(layout.rows().len(), 1);
        assert_eq!(layout.hit_test(0, 0), ClickEvent::marker());
        assert_eq!(layout.hit_test(0, 5), ClickEvent::new(Segment::Remaining, 0));
    }
}
