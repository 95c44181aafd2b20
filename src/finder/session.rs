//! Per-session finder state.
//!
//! One [`Session`] is created per `find`/`find_multi` invocation, mutated
//! only by the foreground event loop, and discarded when the run ends. It
//! owns the query line (rune buffer plus edit position plus cached display
//! column), the filtered match list, the viewport, and the multi-select
//! set. The hot-reload task never touches this state directly; it only
//! hands the loop fresh label snapshots.

use rustc_hash::FxHashMap;
use unicode_width::UnicodeWidthChar as _;

use crate::config::FinderOptions;
use crate::matcher::{self, MatchResult};

/// Display width of a single rune. Control runes count as zero columns.
pub(crate) fn rune_width(r: char) -> usize {
    r.width().unwrap_or(0)
}

/// Display width of a rune slice.
pub(crate) fn runes_width(runes: &[char]) -> usize {
    runes.iter().map(|&r| rune_width(r)).sum()
}

pub(crate) struct Session {
    /// Rendered label per candidate, parallel to the caller's sequence.
    pub labels: Vec<String>,
    /// Current filter output, in candidate order. Row 0 renders at the
    /// bottom of the item area.
    pub matched: Vec<MatchResult>,

    /// Query runes.
    pub input: Vec<char>,
    /// Edit position as a rune index, `0..=input.len()`.
    pub x: usize,
    /// Display column of the edit position. Cached because rune count and
    /// display width diverge on wide glyphs.
    pub cursor_x: usize,

    /// Selected row as an index into `matched`.
    pub y: usize,
    /// Visible row offset of the selected row inside the item window.
    pub cursor_y: usize,

    /// Multi-select set: candidate index to selection sequence number.
    pub selection: FxHashMap<usize, u64>,
    next_seq: u64,
}

impl Session {
    pub fn new(labels: Vec<String>) -> Self {
        let matched = matcher::filter("", matcher::Mode::Smart, &labels);
        Self {
            labels,
            matched,
            input: Vec::new(),
            x: 0,
            cursor_x: 0,
            y: 0,
            cursor_y: 0,
            selection: FxHashMap::default(),
            next_seq: 1,
        }
    }

    pub fn query(&self) -> String {
        self.input.iter().collect()
    }

    // ---- query line editing ----------------------------------------

    /// Inserts a rune at the edit position unless the query would no
    /// longer fit in `max_cols` display columns. Returns whether the
    /// input changed.
    pub fn insert_rune(&mut self, r: char, max_cols: usize) -> bool {
        if runes_width(&self.input) + rune_width(r) > max_cols {
            return false;
        }
        self.input.insert(self.x, r);
        self.cursor_x += rune_width(r);
        self.x += 1;
        true
    }

    /// Removes the rune before the edit position. No-op at the start.
    pub fn backspace(&mut self) -> bool {
        if self.x == 0 {
            return false;
        }
        self.x -= 1;
        let removed = self.input.remove(self.x);
        self.cursor_x -= rune_width(removed);
        true
    }

    /// Removes the rune at the edit position. No-op at the end.
    pub fn delete(&mut self) -> bool {
        if self.x == self.input.len() {
            return false;
        }
        self.input.remove(self.x);
        true
    }

    pub fn move_left(&mut self) {
        if self.x > 0 {
            self.x -= 1;
            self.cursor_x -= rune_width(self.input[self.x]);
        }
    }

    pub fn move_right(&mut self) {
        if self.x < self.input.len() {
            self.cursor_x += rune_width(self.input[self.x]);
            self.x += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.x = 0;
        self.cursor_x = 0;
    }

    pub fn move_end(&mut self) {
        self.x = self.input.len();
        self.cursor_x = runes_width(&self.input);
    }

    /// Deletes the word before the edit position, keeping the tail.
    pub fn kill_word(&mut self) -> bool {
        if self.x == 0 {
            return false;
        }
        let mut start = self.x;
        while start > 0 && self.input[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !self.input[start - 1].is_whitespace() {
            start -= 1;
        }
        self.input.drain(start..self.x);
        self.x = start;
        self.cursor_x = runes_width(&self.input[..self.x]);
        true
    }

    /// Deletes everything before the edit position.
    pub fn kill_to_start(&mut self) -> bool {
        if self.x == 0 {
            return false;
        }
        self.input.drain(..self.x);
        self.x = 0;
        self.cursor_x = 0;
        true
    }

    /// Drops runes from the end until the query fits in `max_cols`
    /// display columns, then re-derives the edit position. Used when a
    /// resize shrinks the input line.
    pub fn truncate_to_width(&mut self, max_cols: usize) -> bool {
        let mut changed = false;
        while !self.input.is_empty() && runes_width(&self.input) > max_cols {
            self.input.pop();
            changed = true;
        }
        if changed {
            self.x = self.x.min(self.input.len());
            self.cursor_x = runes_width(&self.input[..self.x]);
        }
        changed
    }

    // ---- viewport --------------------------------------------------

    /// Moves the selection one row up (toward higher match indices).
    pub fn move_up(&mut self, visible_rows: usize) {
        if self.y + 1 < self.matched.len() {
            self.y += 1;
        }
        if self.cursor_y + 1 < self.matched.len().min(visible_rows) {
            self.cursor_y += 1;
        }
    }

    /// Moves the selection one row down (toward match index 0).
    pub fn move_down(&mut self) {
        if self.y > 0 {
            self.y -= 1;
        }
        if self.cursor_y > 0 {
            self.cursor_y -= 1;
        }
    }

    /// Pages the selection up by one window of rows.
    pub fn page_up(&mut self, visible_rows: usize) {
        if self.matched.is_empty() {
            return;
        }
        let page = visible_rows.max(1);
        let max_y = self.matched.len() - 1;
        self.y += page.min(max_y - self.y);
        let max_cursor = visible_rows.saturating_sub(1).min(max_y);
        self.cursor_y += page.min(max_cursor.saturating_sub(self.cursor_y));
    }

    /// Pages the selection down by one window of rows.
    pub fn page_down(&mut self, visible_rows: usize) {
        let page = visible_rows.max(1);
        self.y -= page.min(self.y);
        self.cursor_y -= page.min(self.cursor_y);
    }

    /// Restores the viewport invariant
    /// `cursor_y <= min(y, visible_rows - 1)` after the match list or the
    /// window height changed.
    pub fn clamp_viewport(&mut self, visible_rows: usize) {
        if self.matched.is_empty() {
            self.y = 0;
            self.cursor_y = 0;
            return;
        }
        self.y = self.y.min(self.matched.len() - 1);
        self.cursor_y = self
            .cursor_y
            .min(self.y)
            .min(visible_rows.saturating_sub(1));
    }

    // ---- selection -------------------------------------------------

    /// Adds a candidate to the selection set with the next sequence
    /// number, unless already present.
    pub fn select(&mut self, index: usize) {
        if !self.selection.contains_key(&index) {
            self.selection.insert(index, self.next_seq);
            self.next_seq += 1;
        }
    }

    /// Toggles the item under the cursor and advances the cursor one row
    /// down, clamped at zero. No-op when nothing matches.
    pub fn toggle_selection(&mut self) {
        let Some(m) = self.matched.get(self.y) else {
            return;
        };
        let index = m.index;
        if self.selection.remove(&index).is_none() {
            self.select(index);
        }
        self.move_down();
    }

    /// Selected candidate indices in selection order.
    pub fn selected_indices(&self) -> Vec<usize> {
        let mut pairs: Vec<(usize, u64)> =
            self.selection.iter().map(|(&i, &seq)| (i, seq)).collect();
        pairs.sort_by_key(|&(_, seq)| seq);
        pairs.into_iter().map(|(i, _)| i).collect()
    }

    // ---- filtering and hot reload ----------------------------------

    /// Re-runs the filter against the current query and re-clamps the
    /// viewport. In single mode a preselection predicate re-anchors the
    /// cursor to the first predicate-matching row.
    pub fn refilter(&mut self, opts: &FinderOptions, multi: bool, visible_rows: usize) {
        self.matched = matcher::filter(&self.query(), opts.mode, &self.labels);
        if self.matched.is_empty() {
            self.y = 0;
            self.cursor_y = 0;
            return;
        }

        if !multi && opts.preselect.is_some() {
            for (row, m) in self.matched.iter().enumerate() {
                if opts.preselected(m.index) {
                    self.y = row;
                    self.cursor_y = row.min(visible_rows.saturating_sub(1));
                    return;
                }
            }
        }

        self.clamp_viewport(visible_rows);
    }

    /// Replaces the label snapshot after a hot reload tick. Newly
    /// discovered candidates go through multi-mode preselection; the
    /// caller re-filters afterwards.
    pub fn update_labels(&mut self, labels: Vec<String>, opts: &FinderOptions, multi: bool) {
        self.labels = labels;
        if multi && opts.preselect.is_some() {
            for i in 0..self.labels.len() {
                if !self.selection.contains_key(&i) && opts.preselected(i) {
                    self.select(i);
                }
            }
        }
    }
}
