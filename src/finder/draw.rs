//! Frame rendering through the terminal backend.
//!
//! Pure consumer of session state: computes the frame layout, paints it
//! cell by cell, and reveals it. When the layout does not fit the current
//! terminal size the frame is skipped entirely and the session stays
//! alive waiting for a resize.

use std::io;

use crossterm::style::Color;

use crate::config::FinderOptions;
use crate::layout::{self, Layout, Rect};
use crate::matcher::fold;
use crate::term::{CellStyle, Terminal};

use super::session::{Session, rune_width, runes_width};

/// Sets a cell, tolerating the i32 layout space.
fn cell<B: Terminal>(term: &mut B, x: i32, y: i32, ch: char, style: CellStyle) {
    if x >= 0 && y >= 0 {
        term.set_cell(x as u16, y as u16, ch, style);
    }
}

/// Renders one frame. A layout that fails to compute or validate leaves
/// the screen cleared and reports success; the caller retries after the
/// next resize.
pub(crate) fn draw<B: Terminal>(
    term: &mut B,
    session: &Session,
    opts: &FinderOptions,
    multi: bool,
) -> io::Result<()> {
    term.clear();
    let (w, h) = term.size();
    let layout = match layout::compute(w, h, opts) {
        Ok(l) => l,
        Err(_) => return term.show(),
    };
    if layout.validate().is_err() {
        return term.show();
    }

    if layout.has_border {
        draw_border(term, layout.content);
    }
    draw_prompt(term, session, opts, &layout);
    if layout.has_header {
        draw_header(term, opts, &layout);
    }
    draw_counter(term, session, &layout);
    draw_items(term, session, opts, multi, &layout);
    if layout.has_preview {
        draw_preview(term, session, opts, &layout);
    }
    term.show()
}

fn draw_border<B: Terminal>(term: &mut B, area: Rect) {
    let style = CellStyle::default();
    let (right, bottom) = (area.x + area.width - 1, area.y + area.height - 1);
    cell(term, area.x, area.y, '┌', style);
    cell(term, right, area.y, '┐', style);
    cell(term, area.x, bottom, '└', style);
    cell(term, right, bottom, '┘', style);
    for x in area.x + 1..right {
        cell(term, x, area.y, '─', style);
        cell(term, x, bottom, '─', style);
    }
    for y in area.y + 1..bottom {
        cell(term, area.x, y, '│', style);
        cell(term, right, y, '│', style);
    }
}

fn draw_prompt<B: Terminal>(
    term: &mut B,
    session: &Session,
    opts: &FinderOptions,
    layout: &Layout,
) {
    let mut pad = 0i32;
    for r in opts.prompt.chars() {
        cell(term, layout.prompt.x + pad, layout.prompt.y, r, CellStyle::fg(Color::Blue));
        pad += rune_width(r) as i32;
    }
    let mut w = 0i32;
    for &r in &session.input {
        cell(
            term,
            layout.prompt.x + pad + w,
            layout.prompt.y,
            r,
            CellStyle::default().bold(),
        );
        w += rune_width(r) as i32;
    }
    term.set_cursor(
        (layout.prompt.x + pad + session.cursor_x as i32).max(0) as u16,
        layout.prompt.y.max(0) as u16,
    );
}

fn draw_header<B: Terminal>(term: &mut B, opts: &FinderOptions, layout: &Layout) {
    let mut w = 0i32;
    let max = layout.header.width - 2;
    for r in truncated(&opts.header, max as usize) {
        cell(term, layout.header.x + 2 + w, layout.header.y, r, CellStyle::fg(Color::Green));
        w += rune_width(r) as i32;
    }
}

fn draw_counter<B: Terminal>(term: &mut B, session: &Session, layout: &Layout) {
    let text = format!("{}/{}", session.matched.len(), session.labels.len());
    for (i, r) in text.chars().enumerate() {
        cell(
            term,
            layout.counter.x + 2 + i as i32,
            layout.counter.y,
            r,
            CellStyle::fg(Color::Yellow),
        );
    }
}

fn draw_items<B: Terminal>(
    term: &mut B,
    session: &Session,
    opts: &FinderOptions,
    multi: bool,
    layout: &Layout,
) {
    let max_width = layout.items.width;
    let first = session.y - session.cursor_y;
    for (i, m) in session.matched[first.min(session.matched.len())..]
        .iter()
        .enumerate()
    {
        if i as i32 >= layout.items.height {
            break;
        }
        // Rows stack bottom-up: row 0 of the window is the lowest line.
        let item_y = layout.items.y + layout.items.height - 1 - i as i32;
        let on_cursor = i == session.cursor_y;

        let marker = CellStyle::fg(Color::Red).on(Color::Black);
        if on_cursor {
            cell(term, layout.items.x, item_y, '>', marker);
            cell(term, layout.items.x + 1, item_y, ' ', marker);
        }
        if multi && session.selection.contains_key(&m.index) {
            cell(term, layout.items.x + 1, item_y, '>', marker);
        }

        let mut qi = 0usize;
        let mut w = 2i32;
        for (j, r) in session.labels[m.index].chars().enumerate() {
            // Highlight runes consumed by the subsequence match.
            let mut highlighted = false;
            if qi < session.input.len()
                && let Some((from, to)) = m.span
                && (from..to).contains(&j)
                && fold(session.input[qi]) == fold(r)
            {
                highlighted = true;
                qi += 1;
            }

            let style = match (on_cursor, highlighted) {
                (true, true) => CellStyle::fg(Color::DarkCyan).bold().on(Color::Black),
                (true, false) => CellStyle::fg(Color::Yellow).bold().on(Color::Black),
                (false, true) => CellStyle::fg(Color::Green),
                (false, false) => CellStyle::default(),
            };

            let rw = rune_width(r) as i32;
            if w + rw + 2 > max_width {
                cell(term, layout.items.x + w, item_y, '.', style);
                cell(term, layout.items.x + w + 1, item_y, '.', style);
                break;
            }
            cell(term, layout.items.x + w, item_y, r, style);
            w += rw;
        }
    }
}

fn draw_preview<B: Terminal>(
    term: &mut B,
    session: &Session,
    opts: &FinderOptions,
    layout: &Layout,
) {
    let Some(preview_fn) = opts.preview.as_ref() else {
        return;
    };
    let area = layout.preview;
    let index = session.matched.get(session.y).map(|m| m.index);
    let content = preview_fn(index, area.width as u16, area.height as u16);

    let style = CellStyle::fg(Color::Black);
    let (right, bottom) = (area.x + area.width - 1, area.y + area.height - 1);
    cell(term, area.x, area.y, '┌', style);
    cell(term, right, area.y, '┐', style);
    cell(term, area.x, bottom, '└', style);
    cell(term, right, bottom, '┘', style);
    for x in area.x + 1..right {
        cell(term, x, area.y, '─', style);
        cell(term, x, bottom, '─', style);
    }

    let mut lines = content.lines();
    for row in 1..area.height - 1 {
        let y = area.y + row;
        cell(term, area.x, y, '│', style);
        cell(term, right, y, '│', style);

        let Some(line) = lines.next() else { continue };
        // One padding column inside each vertical border.
        let max_w = area.width - 2 - 2;
        let mut w = 0i32;
        for r in line.chars() {
            let rw = rune_width(r) as i32;
            if w + rw > max_w {
                cell(term, area.x + 2 + w, y, '.', CellStyle::default());
                if w + 1 < max_w {
                    cell(term, area.x + 2 + w + 1, y, '.', CellStyle::default());
                }
                break;
            }
            cell(term, area.x + 2 + w, y, r, CellStyle::default());
            w += rw;
        }
    }
}

/// Runes of `s` cut to at most `max_cols` display columns, with a ".."
/// marker when anything was dropped.
fn truncated(s: &str, max_cols: usize) -> Vec<char> {
    if runes_width(&s.chars().collect::<Vec<_>>()) <= max_cols {
        return s.chars().collect();
    }
    let mut out: Vec<char> = Vec::new();
    let mut w = 0;
    for r in s.chars() {
        if w + rune_width(r) > max_cols.saturating_sub(2) {
            break;
        }
        w += rune_width(r);
        out.push(r);
    }
    out.push('.');
    out.push('.');
    out
}
