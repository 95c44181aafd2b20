//! Real terminal backend built on crossterm.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{execute, queue};
use unicode_width::UnicodeWidthChar as _;

use super::{CellStyle, TermEvent, Terminal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

/// A [`Terminal`] over the process's controlling terminal, using raw mode
/// and the alternate screen. The pending frame is kept in an off-screen
/// cell grid and repainted in full by [`show`](Terminal::show); at finder
/// scale a full repaint is cheaper than tracking damage.
pub struct CrosstermTerminal {
    out: Stdout,
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    cursor: Option<(u16, u16)>,
    raw: bool,
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            width: 0,
            height: 0,
            cells: Vec::new(),
            cursor: None,
            raw: false,
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::default());
    }

    fn apply_style(&mut self, style: CellStyle) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(style.fg),
            SetBackgroundColor(style.bg),
        )?;
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        Ok(())
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for CrosstermTerminal {
    fn init(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.raw = true;
        execute!(self.out, EnterAlternateScreen, Hide)?;
        let (w, h) = terminal::size()?;
        self.resize(w, h);
        Ok(())
    }

    fn fini(&mut self) -> io::Result<()> {
        if !self.raw {
            return Ok(());
        }
        self.raw = false;
        execute!(self.out, LeaveAlternateScreen, Show)?;
        disable_raw_mode()
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::default());
        self.cursor = None;
    }

    fn set_cell(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        if x >= self.width || y >= self.height {
            return;
        }
        let at = usize::from(y) * usize::from(self.width) + usize::from(x);
        self.cells[at] = Cell { ch, style };
    }

    fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor = Some((x, y));
    }

    fn show(&mut self) -> io::Result<()> {
        queue!(self.out, Hide)?;
        let mut prev_style: Option<CellStyle> = None;
        for y in 0..self.height {
            queue!(self.out, MoveTo(0, y))?;
            let row = usize::from(y) * usize::from(self.width);
            let mut x = 0usize;
            while x < usize::from(self.width) {
                let cell = self.cells[row + x];
                if prev_style != Some(cell.style) {
                    self.apply_style(cell.style)?;
                    prev_style = Some(cell.style);
                }
                queue!(self.out, Print(cell.ch))?;
                // Wide runes own the next cell as well; skip its shadow.
                x += cell.ch.width().unwrap_or(1).max(1);
            }
        }
        queue!(self.out, SetAttribute(Attribute::Reset))?;
        queue!(
            self.out,
            SetForegroundColor(Color::Reset),
            SetBackgroundColor(Color::Reset)
        )?;
        if let Some((x, y)) = self.cursor {
            queue!(self.out, MoveTo(x, y), Show)?;
        }
        self.out.flush()
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TermEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => {
                // Only key presses; release/repeat reports would double
                // every keystroke on some platforms.
                if key.kind != KeyEventKind::Press {
                    return Ok(None);
                }
                Ok(Some(TermEvent::Key(key)))
            }
            Event::Resize(w, h) => {
                self.resize(w, h);
                Ok(Some(TermEvent::Resize(w, h)))
            }
            _ => Ok(None),
        }
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        let _ = self.fini();
    }
}
