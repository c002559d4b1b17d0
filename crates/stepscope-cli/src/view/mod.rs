//! Full-screen source view using ratatui
//!
//! The source panel shows the buffer split at the caret; the stack panel
//! mirrors the call stack. Left clicks in the source panel move the caret.

mod layout;
mod render;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::time::Duration;

use crate::commands::{Session, ViewSettings};
use layout::SourceLayout;

/// Which position field has keyboard focus while editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Line,
    Column,
}

/// Line/column being typed before a run-to request
#[derive(Debug, Clone, PartialEq, Eq)]
struct PositionInput {
    line: String,
    column: String,
    focus: Field,
}

/// Application state for the source view
pub struct App {
    session: Session,
    settings: ViewSettings,
    file_name: String,
    traced: bool,
    /// Layout of the current rendering, rebuilt whenever the caret moves
    layout: SourceLayout,
    /// Inner source panel area from the last draw
    source_area: Rect,
    /// First layout row shown in the source panel
    scroll: usize,
    input: Option<PositionInput>,
    status: String,
    should_quit: bool,
}

impl App {
    pub fn new(session: Session, settings: ViewSettings, file_name: String, traced: bool) -> Self {
        let layout = SourceLayout::new(session.rendered(), settings.caret_glyph);
        let status = if traced {
            "s step · c continue · r run to line/column · click to move · q quit".to_string()
        } else {
            "No trace loaded · r run to line/column · click to move · q quit".to_string()
        };
        Self {
            session,
            settings,
            file_name,
            traced,
            layout,
            source_area: Rect::default(),
            scroll: 0,
            input: None,
            status,
            should_quit: false,
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.input.is_some() {
            self.handle_input_key(key);
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('s') => self.step(),
            KeyCode::Char('c') => self.resume(),
            KeyCode::Char('r') => {
                let fields = self.session.position();
                self.input = Some(PositionInput {
                    line: fields.line.to_string(),
                    column: fields.column.to_string(),
                    focus: Field::Line,
                });
                self.status = "Edit line/column · Tab switch · Enter run · Esc cancel".to_string();
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyCode) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        let field = match input.focus {
            Field::Line => &mut input.line,
            Field::Column => &mut input.column,
        };

        match key {
            KeyCode::Char(ch) if ch.is_ascii_digit() => field.push(ch),
            KeyCode::Backspace => {
                field.pop();
            }
            KeyCode::Tab | KeyCode::BackTab => {
                input.focus = match input.focus {
                    Field::Line => Field::Column,
                    Field::Column => Field::Line,
                };
            }
            KeyCode::Enter => self.submit_position(),
            KeyCode::Esc => {
                self.input = None;
                self.status = "Run cancelled".to_string();
            }
            _ => {}
        }
    }

    fn submit_position(&mut self) {
        let Some(input) = self.input.take() else {
            return;
        };
        let (line, column) = match (input.line.parse::<u32>(), input.column.parse::<usize>()) {
            (Ok(line), Ok(column)) => (line, column),
            _ => {
                self.status = "Line and column must be numbers".to_string();
                self.input = Some(input);
                return;
            }
        };

        match self.session.on_run_requested(line, column) {
            Ok(offset) => {
                self.status = format!("Moved to {} (offset {})", self.session.position(), offset);
                self.refresh();
            }
            Err(err) => {
                self.status = format!("Error: {}", err);
                self.input = Some(input);
            }
        }
    }

    /// Handle mouse input; only left clicks inside the source panel count
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let area = self.source_area;
        let inside = mouse.column >= area.x
            && mouse.column < area.x + area.width
            && mouse.row >= area.y
            && mouse.row < area.y + area.height;
        if !inside {
            return;
        }

        let row = (mouse.row - area.y) as usize + self.scroll;
        let column = (mouse.column - area.x) as usize;
        let event = self.layout.hit_test(row, column);
        tracing::trace!(row, column, ?event, "source panel click");

        match self.session.on_text_click(event) {
            Ok(offset) => {
                self.status = format!("Moved to {} (offset {})", self.session.position(), offset);
                self.refresh();
            }
            Err(err) => self.status = format!("Error: {}", err),
        }
    }

    fn step(&mut self) {
        if !self.resumable() {
            return;
        }
        let result = self.session.on_step();
        self.report(result, "Stepped");
    }

    fn resume(&mut self) {
        if !self.resumable() {
            return;
        }
        let result = self.session.on_continue();
        self.report(result, "Continued");
    }

    fn resumable(&mut self) -> bool {
        if !self.traced {
            self.status = "No trace loaded; there is nothing to run".to_string();
            false
        } else if self.session.is_finished() {
            self.status = "The program has finished".to_string();
            false
        } else {
            true
        }
    }

    fn report(&mut self, result: stepscope_core::ViewResult<()>, verb: &str) {
        self.status = match result {
            Err(err) => format!("Error: {}", err),
            Ok(()) if self.session.is_finished() => format!("{} · program ended", verb),
            Ok(()) => match self.session.active_frame() {
                Some(frame) => format!(
                    "{} into {} at {}:{}",
                    verb,
                    frame.display_name(self.settings.max_name_width),
                    frame.line,
                    frame.column
                ),
                None => format!("{} · no active frame", verb),
            },
        };
        self.refresh();
    }

    /// Rebuild the layout after the rendering changed
    fn refresh(&mut self) {
        self.layout = SourceLayout::new(self.session.rendered(), self.settings.caret_glyph);
    }
}

/// Run the source view until the user quits
pub fn run(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

/// Run the application main loop
fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    <B as ratatui::backend::Backend>::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| render::ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind: KeyEventKind::Press,
                    ..
                }) => app.handle_key(code, modifiers),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
