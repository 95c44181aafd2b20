//! In-memory terminal for deterministic tests.

use std::collections::VecDeque;
use std::io;
use std::thread;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthChar as _;

use super::{CellStyle, TermEvent, Terminal};

enum Scripted {
    Event(TermEvent),
    /// Sleep, then report "no event". Gives background tasks (hot reload,
    /// an appending host thread) time to run mid-script.
    Wait(Duration),
}

/// A [`Terminal`] over an in-memory cell grid with a scripted event queue.
///
/// Events are handed to the finder in push order; once the script is
/// exhausted, [`poll_event`](Terminal::poll_event) reports end-of-input,
/// which the finder treats as an abort. The rendered frame is readable as
/// plain text through [`screen`](MockTerminal::screen).
pub struct MockTerminal {
    width: u16,
    height: u16,
    cells: Vec<char>,
    styles: Vec<CellStyle>,
    cursor: Option<(u16, u16)>,
    events: VecDeque<Scripted>,
    shown: bool,
}

impl MockTerminal {
    pub fn new(width: u16, height: u16) -> Self {
        let n = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![' '; n],
            styles: vec![CellStyle::default(); n],
            cursor: None,
            events: VecDeque::new(),
            shown: false,
        }
    }

    /// Appends a raw event to the script.
    pub fn push(&mut self, event: TermEvent) {
        self.events.push_back(Scripted::Event(event));
    }

    /// Appends an unmodified key press.
    pub fn push_key(&mut self, code: KeyCode) {
        self.push(TermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    /// Appends a Ctrl-modified key press.
    pub fn push_ctrl(&mut self, ch: char) {
        self.push(TermEvent::Key(KeyEvent::new(
            KeyCode::Char(ch),
            KeyModifiers::CONTROL,
        )));
    }

    /// Appends one key press per rune of `text`.
    pub fn type_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.push_key(KeyCode::Char(ch));
        }
    }

    /// Appends a pause, letting concurrent activity land between keys.
    pub fn push_wait(&mut self, d: Duration) {
        self.events.push_back(Scripted::Wait(d));
    }

    /// The last revealed frame as text, one line per row, right-trimmed.
    pub fn screen(&self) -> String {
        let mut out = String::new();
        for y in 0..usize::from(self.height) {
            let row = y * usize::from(self.width);
            let mut line = String::new();
            let mut x = 0usize;
            while x < usize::from(self.width) {
                let ch = self.cells[row + x];
                line.push(ch);
                x += ch.width().unwrap_or(1).max(1);
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }

    /// Style of the cell at (x, y) in the last revealed frame.
    pub fn style_at(&self, x: u16, y: u16) -> CellStyle {
        self.styles[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    /// Cursor position in the last revealed frame, if placed.
    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    /// Whether at least one frame was revealed.
    pub fn frame_shown(&self) -> bool {
        self.shown
    }
}

impl Terminal for MockTerminal {
    fn init(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn fini(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.cells.fill(' ');
        self.styles.fill(CellStyle::default());
        self.cursor = None;
    }

    fn set_cell(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        if x >= self.width || y >= self.height {
            return;
        }
        let at = usize::from(y) * usize::from(self.width) + usize::from(x);
        self.cells[at] = ch;
        self.styles[at] = style;
    }

    fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor = Some((x, y));
    }

    fn show(&mut self) -> io::Result<()> {
        self.shown = true;
        Ok(())
    }

    fn poll_event(&mut self, _timeout: Duration) -> io::Result<Option<TermEvent>> {
        match self.events.pop_front() {
            Some(Scripted::Wait(d)) => {
                thread::sleep(d);
                Ok(None)
            }
            Some(Scripted::Event(TermEvent::Resize(w, h))) => {
                let n = usize::from(w) * usize::from(h);
                self.width = w;
                self.height = h;
                self.cells = vec![' '; n];
                self.styles = vec![CellStyle::default(); n];
                Ok(Some(TermEvent::Resize(w, h)))
            }
            Some(Scripted::Event(e)) => Ok(Some(e)),
            None => Ok(Some(TermEvent::Eof)),
        }
    }
}
