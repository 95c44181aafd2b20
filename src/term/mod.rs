//! Terminal backend boundary.
//!
//! The finder draws frames and receives input exclusively through the
//! [`Terminal`] trait, so the interactive core never talks to a real
//! terminal directly. Two implementations ship with the crate: a crossterm
//! backend for real sessions and an in-memory [`MockTerminal`] that scripts
//! input events for deterministic tests.

mod crossterm_backend;
mod mock;

pub use crossterm_backend::CrosstermTerminal;
pub use mock::MockTerminal;

use std::io;
use std::time::Duration;

use crossterm::event::KeyEvent;
use crossterm::style::Color;

/// An input event delivered by a terminal backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermEvent {
    /// A key press.
    Key(KeyEvent),
    /// The terminal was resized to (width, height).
    Resize(u16, u16),
    /// The input source is exhausted; the session should abort.
    Eof,
}

/// Style applied to a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            fg: Color::Reset,
            bg: Color::Reset,
            bold: false,
        }
    }
}

impl CellStyle {
    /// Plain style with the given foreground color.
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn on(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }
}

/// Capability set the finder consumes from a terminal.
///
/// `clear`, `set_cell` and `set_cursor` mutate an off-screen frame;
/// `show` reveals it. `poll_event` blocks for at most `timeout` waiting
/// for the next input or resize event.
pub trait Terminal {
    /// Puts the terminal into finder mode (raw input, alternate screen).
    fn init(&mut self) -> io::Result<()>;

    /// Restores the terminal to its pre-[`init`](Terminal::init) state.
    fn fini(&mut self) -> io::Result<()>;

    /// Current (width, height) in cells.
    fn size(&self) -> (u16, u16);

    /// Resets the pending frame to blank cells.
    fn clear(&mut self);

    /// Sets one cell of the pending frame. Out-of-bounds writes are
    /// silently dropped. Wide runes occupy their own cell plus a shadow
    /// cell to the right that callers must not overwrite.
    fn set_cell(&mut self, x: u16, y: u16, ch: char, style: CellStyle);

    /// Places the visible cursor in the revealed frame.
    fn set_cursor(&mut self, x: u16, y: u16);

    /// Reveals the pending frame.
    fn show(&mut self) -> io::Result<()>;

    /// Blocks until the next event or until `timeout` elapses.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TermEvent>>;
}
