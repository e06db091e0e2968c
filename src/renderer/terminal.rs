//! Crossterm render sink
//!
//! Redraws only the lines that changed since the previous frame. All commands
//! are batched with `queue!` and flushed once per frame.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};

pub struct TerminalSink {
    writer: BufWriter<Stdout>,
    previous: Vec<String>,
    active: bool,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            writer: BufWriter::with_capacity(8192, io::stdout()),
            previous: Vec::new(),
            active: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )?;
        self.previous.clear();
        self.active = true;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.writer, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        if self.previous.is_empty() {
            queue!(self.writer, Clear(ClearType::All))?;
        }

        for (row, line) in lines.iter().enumerate() {
            if self.previous.get(row) == Some(line) {
                continue;
            }
            queue!(
                self.writer,
                MoveTo(0, row as u16),
                Clear(ClearType::CurrentLine),
                Print(line)
            )?;
        }
        for row in lines.len()..self.previous.len() {
            queue!(self.writer, MoveTo(0, row as u16), Clear(ClearType::CurrentLine))?;
        }

        self.writer.flush()?;
        self.previous = lines.to_vec();
        Ok(())
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalSink {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            log::warn!("Terminal cleanup failed: {e}");
        }
    }
}
