//! Interactive debugger REPL
//!
//! Drives a [`Session`] from typed commands and prints the caret, the
//! position fields and the call stack after each one.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs;
use std::path::PathBuf;
use stepscope_core::{ClickEvent, Segment, ViewError};

use crate::commands::{Session, ViewSettings};

/// Debugger REPL state
pub struct DebugRepl {
    session: Session,
    file_name: String,
    source_lines: Vec<String>,
    settings: ViewSettings,
    traced: bool,
    running: bool,
}

impl DebugRepl {
    /// Create a new debugger REPL
    pub fn new(session: Session, file_name: String, settings: ViewSettings, traced: bool) -> Self {
        let source_lines = session.source().lines().map(String::from).collect();
        Self {
            session,
            file_name,
            source_lines,
            settings,
            traced,
            running: true,
        }
    }

    /// Run the interactive debugger REPL
    pub fn run(&mut self, history_path: Option<PathBuf>) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;
        if let Some(ref path) = history_path {
            let _ = rl.load_history(path);
        }

        println!();
        println!("{}", "stepscope debugger".bold().cyan());
        println!("Type {} for available commands.", "help".bold());
        println!("Debugging: {}", self.file_name.yellow());
        if !self.traced {
            println!(
                "{} no trace loaded; use 'run' or 'click' to move the caret.",
                "Note:".yellow()
            );
        }
        println!();

        self.show_current_location();

        while self.running {
            let prompt = self.get_prompt();
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(trimmed);
                    self.execute_command(trimmed);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C - Use 'quit' to exit");
                }
                Err(ReadlineError::Eof) => {
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Err(err) = rl.save_history(&path) {
                tracing::debug!(error = %err, "could not save history");
            }
        }

        println!("Debugger exited.");
        Ok(())
    }

    /// Get the prompt string based on session state
    fn get_prompt(&self) -> String {
        if self.session.is_finished() {
            format!("{} > ", "(finished)".red())
        } else if self.session.active_frame().is_some() {
            format!("{} > ", "(paused)".yellow())
        } else {
            format!("{} > ", "(debug)".green())
        }
    }

    /// Execute a debugger command
    pub fn execute_command(&mut self, input: &str) {
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            return;
        }

        let cmd = parts[0].to_lowercase();
        let args = &parts[1..];

        match cmd.as_str() {
            "help" | "h" | "?" => self.cmd_help(),
            "quit" | "q" | "exit" => self.cmd_quit(),
            "step" | "s" => self.cmd_step(),
            "continue" | "c" => self.cmd_continue(),
            "run" | "r" => self.cmd_run(args),
            "click" => self.cmd_click(args),
            "show" => self.cmd_show(),
            "where" | "w" | "location" | "loc" => self.show_current_location(),
            "backtrace" | "bt" => self.cmd_backtrace(),
            "list" | "l" => self.cmd_list(args),
            _ => println!(
                "Unknown command: '{}'. Type 'help' for available commands.",
                cmd
            ),
        }
    }

    // ── Command implementations ───────────────────────────────────────────────

    fn cmd_help(&self) {
        println!();
        println!("{}", "Debugger Commands:".bold());
        println!();
        println!("  {}", "Execution:".bold().yellow());
        println!("    step, s                 Run until the next frame is entered");
        println!("    continue, c             Run to the end of the trace");
        println!("    run <line> <column>, r  Move the caret to a line and column");
        println!();
        println!("  {}", "Caret:".bold().yellow());
        println!("    click consumed <n>      Click n characters into the executed text");
        println!("    click marker            Click the caret marker");
        println!("    click remaining <n>     Click n characters past the caret");
        println!();
        println!("  {}", "Inspection:".bold().yellow());
        println!("    show                    Print the buffer split at the caret");
        println!("    where, w                Show the caret position and active frame");
        println!("    backtrace, bt           Show the call stack");
        println!("    list [line], l          List source around the caret or a line");
        println!();
        println!("  {}", "Other:".bold().yellow());
        println!("    help, h, ?              Show this help");
        println!("    quit, q, exit           Exit debugger");
        println!();
    }

    fn cmd_quit(&mut self) {
        self.running = false;
    }

    fn cmd_step(&mut self) {
        if !self.resumable() {
            return;
        }
        match self.session.on_step() {
            Ok(()) => self.report_stop("Stepped"),
            Err(err) => print_error(&err),
        }
    }

    fn cmd_continue(&mut self) {
        if !self.resumable() {
            return;
        }
        match self.session.on_continue() {
            Ok(()) => self.report_stop("Continued"),
            Err(err) => print_error(&err),
        }
    }

    fn cmd_run(&mut self, args: &[&str]) {
        let (line, column) = match args {
            [line, column] => match (line.parse::<u32>(), column.parse::<usize>()) {
                (Ok(line), Ok(column)) => (line, column),
                _ => {
                    println!("Usage: run <line> <column>");
                    return;
                }
            },
            _ => {
                println!("Usage: run <line> <column>");
                return;
            }
        };

        match self.session.on_run_requested(line, column) {
            Ok(offset) => {
                println!("Caret moved to offset {} ({})", offset, self.session.position());
                self.display_source_context(line as usize, 2);
            }
            Err(err) => print_error(&err),
        }
    }

    fn cmd_click(&mut self, args: &[&str]) {
        let Some(event) = parse_click(args) else {
            println!("Usage: click <consumed|marker|remaining> <offset>");
            return;
        };

        match self.session.on_text_click(event) {
            Ok(offset) => {
                println!("Caret moved to offset {} ({})", offset, self.session.position());
            }
            Err(err) => print_error(&err),
        }
    }

    fn cmd_show(&self) {
        let rendered = self.session.rendered();
        println!();
        println!(
            "{}{}{}",
            rendered.consumed.dimmed(),
            self.settings.caret_glyph.to_string().bold().yellow(),
            rendered.remaining
        );
        println!();
    }

    fn cmd_backtrace(&self) {
        let frames = self.session.frames();
        if frames.is_empty() {
            println!("No stack frames.");
            return;
        }

        println!();
        println!("{}", "Call Stack:".bold());
        for (depth, frame) in frames.iter().rev().enumerate() {
            let marker = if depth == 0 { "→" } else { " " };
            println!(
                "  {} #{} {} at {}:{} (offset {})",
                marker,
                depth,
                frame.display_name(self.settings.max_name_width).yellow(),
                frame.line,
                frame.column,
                frame.offset
            );
        }
        println!();
    }

    fn cmd_list(&self, args: &[&str]) {
        let center_line = match args.first() {
            Some(arg) => match arg.parse::<usize>() {
                Ok(line) => line,
                Err(_) => {
                    println!("Invalid line number: '{}'", arg);
                    return;
                }
            },
            None => self.session.position().line as usize,
        };

        self.display_source_context(center_line, 5);
    }

    // ── Helper methods ────────────────────────────────────────────────────────

    /// Whether step/continue have anything to do
    fn resumable(&self) -> bool {
        if !self.traced {
            println!("No trace loaded; there is nothing to run.");
            false
        } else if self.session.is_finished() {
            println!("The program has finished.");
            false
        } else {
            true
        }
    }

    fn report_stop(&self, verb: &str) {
        if self.session.is_finished() {
            println!("{} (program ended)", verb.yellow());
            return;
        }
        match self.session.active_frame() {
            Some(frame) => {
                println!(
                    "{} into {} at {}:{}",
                    verb.yellow(),
                    frame.display_name(self.settings.max_name_width),
                    frame.line,
                    frame.column
                );
                self.display_source_context(frame.line as usize, 2);
            }
            None => println!("{} (no active frame)", verb.yellow()),
        }
    }

    fn show_current_location(&self) {
        let position = self.session.position();
        println!(
            "At {}:{} (offset {})",
            self.file_name,
            position,
            self.session.caret()
        );
        match self.session.active_frame() {
            Some(frame) => println!(
                "In frame {} (depth {})",
                frame
                    .display_name(self.settings.max_name_width)
                    .yellow(),
                self.session.frames().len()
            ),
            None => println!("No active frame."),
        }
        self.display_source_context(position.line as usize, 2);
    }

    fn display_source_context(&self, center_line: usize, context: usize) {
        let start = center_line.saturating_sub(context).max(1);
        let end = center_line
            .saturating_add(context)
            .min(self.source_lines.len());
        let position = self.session.position();

        println!();
        for line_num in start..=end {
            let line = &self.source_lines[line_num - 1];
            let gutter = format!("{:4}", line_num).bright_black();

            if line_num == position.line as usize {
                let text = insert_glyph(line, position.column, self.settings.caret_glyph);
                println!("{} {} │ {}", "→".yellow(), gutter, text.bold());
            } else {
                println!("  {} │ {}", gutter, line);
            }
        }
        println!();
    }
}

/// Parse `click` arguments into an event
fn parse_click(args: &[&str]) -> Option<ClickEvent> {
    let segment = match args.first()?.to_lowercase().as_str() {
        "consumed" => Segment::Consumed,
        "marker" => return Some(ClickEvent::marker()),
        "remaining" => Segment::Remaining,
        _ => return None,
    };
    let offset = args.get(1)?.parse::<usize>().ok()?;
    Some(ClickEvent::new(segment, offset))
}

/// A source line with the caret glyph drawn before `column`
fn insert_glyph(line: &str, column: usize, glyph: char) -> String {
    let mut out = String::with_capacity(line.len() + glyph.len_utf8());
    let mut inserted = false;
    for (index, ch) in line.chars().enumerate() {
        if index == column {
            out.push(glyph);
            inserted = true;
        }
        out.push(ch);
    }
    if !inserted {
        out.push(glyph);
    }
    out
}

fn print_error(err: &ViewError) {
    println!("{} {}", "Error:".red(), err);
}
