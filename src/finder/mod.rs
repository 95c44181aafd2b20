//! The finder controller: session state machine, event loop, hot reload,
//! and the embedding API.
//!
//! A session is `Active` from construction until one terminal state is
//! reached: accepted (`Ok`), aborted, or cancelled. All state mutation is
//! serialized through the foreground event loop; the optional hot-reload
//! task only ever hands the loop new label snapshots over a bounded
//! channel and never touches query, cursor, or selection state.

mod draw;
mod session;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::{FinderOptions, RenderMode};
use crate::error::{FindError, FindResult};
use crate::layout;
use crate::term::{CrosstermTerminal, TermEvent, Terminal};

use session::{Session, runes_width};

/// How long the event loop blocks waiting for input before re-checking
/// cancellation and pending work.
const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Debounce window merging bursts of redraw requests into one frame.
const DRAW_DEBOUNCE: Duration = Duration::from_millis(10);
/// Wake interval of the hot-reload task.
const RELOAD_INTERVAL: Duration = Duration::from_millis(30);

/// Where candidates come from.
///
/// `Static` hands the finder a fixed sequence. `HotReload` hands it a
/// shared, growable sequence that the host keeps appending to while the
/// finder is running; the finder re-reads it under the shared lock on a
/// short interval and re-filters when the length changes.
pub enum Source<'a, T> {
    Static(&'a [T]),
    HotReload(&'a Arc<RwLock<Vec<T>>>),
}

/// An interactive fuzzy-selection session factory bound to a terminal
/// backend. Every `find`/`find_multi` call runs one full session: the
/// terminal is initialized, the loop runs to a terminal state, and the
/// terminal is restored before returning.
pub struct Finder<B: Terminal> {
    term: B,
}

impl Finder<CrosstermTerminal> {
    /// A finder over the process's controlling terminal.
    pub fn new() -> Self {
        Self::with_terminal(CrosstermTerminal::new())
    }
}

impl Default for Finder<CrosstermTerminal> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Terminal> Finder<B> {
    /// A finder over a caller-supplied backend (a custom embedding, or a
    /// [`MockTerminal`](crate::term::MockTerminal) in tests).
    pub fn with_terminal(term: B) -> Self {
        Self { term }
    }

    /// The underlying terminal backend.
    pub fn terminal(&self) -> &B {
        &self.term
    }

    /// Runs a single-selection session and returns the chosen candidate
    /// index. Aborting returns [`FindError::Abort`], never an index.
    pub fn find<T, F>(&mut self, source: Source<'_, T>, label: F, opts: FinderOptions) -> FindResult<usize>
    where
        T: Send + Sync,
        F: Fn(&T) -> String + Sync,
    {
        let res = self.run(source, label, opts, false)?;
        match res.first() {
            Some(&index) => Ok(index),
            // An accepted session always carries at least one index.
            None => Err(FindError::Abort),
        }
    }

    /// Runs a multi-selection session (Tab toggles membership) and
    /// returns the chosen indices in selection order.
    pub fn find_multi<T, F>(
        &mut self,
        source: Source<'_, T>,
        label: F,
        opts: FinderOptions,
    ) -> FindResult<Vec<usize>>
    where
        T: Send + Sync,
        F: Fn(&T) -> String + Sync,
    {
        self.run(source, label, opts, true)
    }

    fn run<T, F>(
        &mut self,
        source: Source<'_, T>,
        label: F,
        opts: FinderOptions,
        multi: bool,
    ) -> FindResult<Vec<usize>>
    where
        T: Send + Sync,
        F: Fn(&T) -> String + Sync,
    {
        opts.validate()?;

        let labels: Vec<String> = match &source {
            Source::Static(items) => items.iter().map(&label).collect(),
            Source::HotReload(shared) => {
                let guard = shared.read().unwrap_or_else(PoisonError::into_inner);
                guard.iter().map(&label).collect()
            }
        };
        let initial_len = labels.len();

        self.term.init().map_err(FindError::TerminalInit)?;

        let stop = AtomicBool::new(false);
        let term = &mut self.term;
        let label = &label;
        let opts = &opts;
        let result = thread::scope(|scope| {
            let (tx, rx) = sync_channel::<Vec<String>>(1);
            if let Source::HotReload(shared) = source {
                let stop = &stop;
                let cancel = opts.cancel.as_deref();
                scope.spawn(move || reload_loop(shared, label, initial_len, tx, stop, cancel));
            }

            let out = event_loop(term, labels, &rx, opts, multi);
            stop.store(true, Ordering::SeqCst);
            out
        });

        self.term.fini()?;
        result
    }
}

/// Single-selection convenience over the process terminal.
pub fn find<T, F>(source: Source<'_, T>, label: F, opts: FinderOptions) -> FindResult<usize>
where
    T: Send + Sync,
    F: Fn(&T) -> String + Sync,
{
    Finder::new().find(source, label, opts)
}

/// Multi-selection convenience over the process terminal.
pub fn find_multi<T, F>(source: Source<'_, T>, label: F, opts: FinderOptions) -> FindResult<Vec<usize>>
where
    T: Send + Sync,
    F: Fn(&T) -> String + Sync,
{
    Finder::new().find_multi(source, label, opts)
}

/// Background task: watch the shared candidate container and hand the
/// foreground loop a fresh label snapshot whenever its length changes.
/// Labels are rendered while the read lock is held, so the host can keep
/// appending under the write lock without tearing a snapshot.
fn reload_loop<T, F>(
    shared: &Arc<RwLock<Vec<T>>>,
    label: &F,
    mut prev_len: usize,
    tx: SyncSender<Vec<String>>,
    stop: &AtomicBool,
    cancel: Option<&AtomicBool>,
) where
    F: Fn(&T) -> String,
{
    while !stop.load(Ordering::SeqCst) && !cancel.is_some_and(|c| c.load(Ordering::SeqCst)) {
        thread::sleep(RELOAD_INTERVAL);
        let snapshot: Option<Vec<String>> = {
            let guard = shared.read().unwrap_or_else(PoisonError::into_inner);
            if guard.len() == prev_len {
                None
            } else {
                Some(guard.iter().map(label).collect())
            }
        };
        if let Some(labels) = snapshot {
            let len = labels.len();
            match tx.try_send(labels) {
                Ok(()) => prev_len = len,
                // Channel full or loop gone: leave prev_len untouched so
                // the next tick rebuilds and retries.
                Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

fn cancelled(opts: &FinderOptions) -> bool {
    opts.cancel
        .as_ref()
        .is_some_and(|c| c.load(Ordering::SeqCst))
}

/// Item rows visible at the current terminal size; zero when the layout
/// does not fit.
fn visible_rows<B: Terminal>(term: &B, opts: &FinderOptions) -> usize {
    let (w, h) = term.size();
    match layout::compute(w, h, opts) {
        Ok(l) if l.validate().is_ok() => l.items.height as usize,
        _ => 0,
    }
}

/// Display columns available for the query on the prompt line: the list
/// width minus the prompt and one cursor cell. Falls back to the raw
/// terminal width while the layout does not fit, so typing keeps working
/// through a transiently tiny window.
fn max_query_cols<B: Terminal>(term: &B, opts: &FinderOptions) -> usize {
    let (w, h) = term.size();
    let prompt_cols = runes_width(&opts.prompt.chars().collect::<Vec<_>>());
    let list_width = match layout::compute(w, h, opts) {
        Ok(l) if l.validate().is_ok() => l.list.width as usize,
        _ => usize::from(w),
    };
    list_width.saturating_sub(prompt_cols + 1)
}

/// Coalesces redraw requests. `Debounced` arms a short timer so a burst
/// of updates becomes one frame; `Immediate` reports that the caller must
/// render synchronously, which keeps tests reproducible.
struct DrawScheduler {
    mode: RenderMode,
    deadline: Option<Instant>,
}

impl DrawScheduler {
    fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            deadline: None,
        }
    }

    /// Registers a redraw request; returns whether the caller must draw
    /// right now.
    fn request(&mut self) -> bool {
        match self.mode {
            RenderMode::Immediate => true,
            RenderMode::Debounced => {
                self.deadline = Some(Instant::now() + DRAW_DEBOUNCE);
                false
            }
        }
    }

    fn due(&self) -> bool {
        self.deadline.is_some_and(|d| d <= Instant::now())
    }

    fn drawn(&mut self) {
        self.deadline = None;
    }

    /// Poll timeout: the time until the pending draw, capped at the base
    /// interval.
    fn timeout(&self) -> Duration {
        match self.deadline {
            Some(d) => d.saturating_duration_since(Instant::now()).min(POLL_INTERVAL),
            None => POLL_INTERVAL,
        }
    }
}

fn event_loop<B: Terminal>(
    term: &mut B,
    labels: Vec<String>,
    reload_rx: &Receiver<Vec<String>>,
    opts: &FinderOptions,
    multi: bool,
) -> FindResult<Vec<usize>> {
    let mut session = Session::new(labels);
    init_session(&mut session, term, opts, multi);

    if opts.select_one && session.matched.len() == 1 {
        return Ok(vec![session.matched[0].index]);
    }

    let mut sched = DrawScheduler::new(opts.render);
    if sched.request() {
        draw::draw(term, &session, opts, multi)?;
    }

    loop {
        if cancelled(opts) {
            return Err(FindError::Cancelled);
        }

        // At most one pending label snapshot per wake.
        if let Ok(new_labels) = reload_rx.try_recv() {
            session.update_labels(new_labels, opts, multi);
            session.refilter(opts, multi, visible_rows(term, opts));
            if sched.request() {
                draw::draw(term, &session, opts, multi)?;
            }
        }

        if sched.due() {
            draw::draw(term, &session, opts, multi)?;
            sched.drawn();
        }

        let event = term.poll_event(sched.timeout())?;
        let outcome = match event {
            None => continue,
            Some(TermEvent::Eof) => return Err(FindError::Abort),
            Some(TermEvent::Resize(_, _)) => {
                handle_resize(&mut session, term, opts, multi);
                KeyOutcome::Changed
            }
            Some(TermEvent::Key(key)) => handle_key(&mut session, term, opts, multi, key)?,
        };

        match outcome {
            KeyOutcome::Ignored => {}
            KeyOutcome::Changed => {
                if sched.request() {
                    draw::draw(term, &session, opts, multi)?;
                }
            }
            KeyOutcome::Accepted(indices) => return Ok(indices),
        }
    }
}

/// Applies initial query, preselection and cursor-position options, in
/// that order of precedence.
fn init_session<B: Terminal>(session: &mut Session, term: &B, opts: &FinderOptions, multi: bool) {
    let mut cursor_positioned = false;
    if multi {
        for i in 0..session.labels.len() {
            if opts.preselected(i) {
                session.select(i);
            }
        }
    } else if opts.preselect.is_some() {
        // Park the cursor on the first preselected candidate.
        if let Some(row) = session
            .matched
            .iter()
            .position(|m| opts.preselected(m.index))
        {
            session.y = row;
            session.cursor_y = row.min(visible_rows(term, opts).saturating_sub(1));
            cursor_positioned = true;
        }
    }

    if !cursor_positioned && opts.begin_at_top && !session.matched.is_empty() {
        session.y = session.matched.len() - 1;
        session.cursor_y = session
            .y
            .min(visible_rows(term, opts).saturating_sub(1));
    }

    if !opts.query.is_empty() {
        session.input = opts.query.chars().collect();
        session.x = session.input.len();
        session.cursor_x = runes_width(&session.input);
        session.refilter(opts, multi, visible_rows(term, opts));
    }
}

enum KeyOutcome {
    /// Nothing to redraw.
    Ignored,
    /// State changed; schedule a redraw.
    Changed,
    /// Enter committed a selection.
    Accepted(Vec<usize>),
}

fn handle_key<B: Terminal>(
    session: &mut Session,
    term: &B,
    opts: &FinderOptions,
    multi: bool,
    key: KeyEvent,
) -> FindResult<KeyOutcome> {
    let rows = visible_rows(term, opts);
    let mut query_changed = false;
    let mut changed = true;

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc)
        | (KeyModifiers::CONTROL, KeyCode::Char('c'))
        | (KeyModifiers::CONTROL, KeyCode::Char('d')) => return Err(FindError::Abort),

        (_, KeyCode::Enter) => {
            if session.matched.is_empty() {
                return Err(FindError::Abort);
            }
            if multi && !session.selection.is_empty() {
                return Ok(KeyOutcome::Accepted(session.selected_indices()));
            }
            return Ok(KeyOutcome::Accepted(vec![session.matched[session.y].index]));
        }

        (_, KeyCode::Backspace) | (KeyModifiers::CONTROL, KeyCode::Char('h')) => {
            query_changed = session.backspace();
        }
        (_, KeyCode::Delete) => query_changed = session.delete(),
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => query_changed = session.kill_word(),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => query_changed = session.kill_to_start(),

        (_, KeyCode::Left) | (KeyModifiers::CONTROL, KeyCode::Char('b')) => session.move_left(),
        (_, KeyCode::Right) | (KeyModifiers::CONTROL, KeyCode::Char('f')) => session.move_right(),
        (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => session.move_home(),
        (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => session.move_end(),

        (_, KeyCode::Up)
        | (KeyModifiers::CONTROL, KeyCode::Char('k'))
        | (KeyModifiers::CONTROL, KeyCode::Char('p')) => session.move_up(rows),
        (_, KeyCode::Down)
        | (KeyModifiers::CONTROL, KeyCode::Char('j'))
        | (KeyModifiers::CONTROL, KeyCode::Char('n')) => session.move_down(),
        (_, KeyCode::PageUp) => session.page_up(rows),
        (_, KeyCode::PageDown) => session.page_down(rows),

        (_, KeyCode::Tab) => {
            if multi {
                session.toggle_selection();
            } else {
                changed = false;
            }
        }

        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            query_changed = session.insert_rune(c, max_query_cols(term, opts));
            changed = query_changed;
        }

        _ => changed = false,
    }

    if query_changed {
        session.refilter(opts, multi, rows);
        changed = true;
    }
    Ok(if changed {
        KeyOutcome::Changed
    } else {
        KeyOutcome::Ignored
    })
}

/// Re-clamps the viewport against the new window height and truncates
/// the query if the new width can no longer hold it.
fn handle_resize<B: Terminal>(session: &mut Session, term: &B, opts: &FinderOptions, multi: bool) {
    session.clamp_viewport(visible_rows(term, opts));
    if session.truncate_to_width(max_query_cols(term, opts)) {
        session.refilter(opts, multi, visible_rows(term, opts));
    }
}
