//! Drawing for the source view

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::layout::{CellKind, Row};
use super::{App, Field};

fn cell_style(kind: CellKind) -> Style {
    match kind {
        CellKind::Consumed => Style::default().fg(Color::DarkGray),
        CellKind::Marker => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        CellKind::Remaining => Style::default(),
    }
}

/// One layout row as spans, merging runs of the same kind
fn row_line(row: &Row) -> Line<'static> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_kind = None;

    for cell in &row.cells {
        if run_kind != Some(cell.kind) {
            if let Some(kind) = run_kind {
                spans.push(Span::styled(std::mem::take(&mut run), cell_style(kind)));
            }
            run_kind = Some(cell.kind);
        }
        run.push(cell.ch);
    }
    if let Some(kind) = run_kind {
        spans.push(Span::styled(run, cell_style(kind)));
    }

    Line::from(spans)
}

/// Keep `caret_row` inside a window of `height` rows starting at `scroll`
fn adjust_scroll(scroll: usize, caret_row: usize, height: usize) -> usize {
    if height == 0 || caret_row < scroll {
        caret_row
    } else if caret_row >= scroll + height {
        caret_row + 1 - height
    } else {
        scroll
    }
}

/// Draw the UI
pub(super) fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Source and stack
            Constraint::Length(3), // Position fields
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[0]);

    // Source panel
    let source_block = Block::default()
        .title(format!(" {} ", app.file_name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = source_block.inner(panels[0]);
    app.source_area = inner;
    app.scroll = adjust_scroll(app.scroll, app.layout.caret_row(), inner.height as usize);

    let lines: Vec<Line> = app
        .layout
        .rows()
        .iter()
        .skip(app.scroll)
        .take(inner.height as usize)
        .map(row_line)
        .collect();
    f.render_widget(Paragraph::new(Text::from(lines)).block(source_block), panels[0]);

    // Stack panel, innermost frame first
    let width = app.settings.max_name_width;
    let items: Vec<ListItem> = app
        .session
        .frames()
        .iter()
        .rev()
        .enumerate()
        .map(|(depth, frame)| {
            let style = if depth == 0 {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(frame.display_name(width), style),
                Span::styled(
                    format!(" {}:{}", frame.line, frame.column),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    let stack_widget = List::new(items).block(
        Block::default()
            .title(" Stack ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(stack_widget, panels[1]);

    // Position fields
    let fields = app.session.position();
    let focus_style = Style::default().bg(Color::White).fg(Color::Black);
    let (line_text, column_text, line_style, column_style, border) = match &app.input {
        Some(input) => {
            let (line_style, column_style) = match input.focus {
                Field::Line => (focus_style, Style::default()),
                Field::Column => (Style::default(), focus_style),
            };
            (
                input.line.clone(),
                input.column.clone(),
                line_style,
                column_style,
                Color::Yellow,
            )
        }
        None => (
            fields.line.to_string(),
            fields.column.to_string(),
            Style::default(),
            Style::default(),
            Color::White,
        ),
    };
    let position_line = Line::from(vec![
        Span::raw("Line: "),
        Span::styled(format!(" {:>5} ", line_text), line_style),
        Span::raw("   Column: "),
        Span::styled(format!(" {:>5} ", column_text), column_style),
        Span::styled(
            format!("   offset {}", app.session.caret()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let position_widget = Paragraph::new(position_line).block(
        Block::default()
            .title(" Position (r to edit) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(position_widget, chunks[1]);

    // Status bar
    let status_widget = Paragraph::new(app.status.as_str()).style(Style::default().fg(Color::Gray));
    f.render_widget(status_widget, chunks[2]);
}
