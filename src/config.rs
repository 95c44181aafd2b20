//! Session configuration.
//!
//! One [`FinderOptions`] value configures one finder session. Every
//! recognized option and its default is a named field; the struct is
//! validated once at session construction and is immutable for the rest
//! of the run.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::error::{FindError, FindResult};
use crate::matcher::Mode;

/// Produces the preview panel content for the candidate under the cursor.
/// Receives `None` when the match list is empty, plus the preview area's
/// inner width and height in cells.
pub type PreviewFn = Box<dyn Fn(Option<usize>, u16, u16) -> String>;

/// Decides whether a candidate starts out selected (multi mode) or under
/// the cursor (single mode).
pub type PreselectFn = Box<dyn Fn(usize) -> bool>;

/// How redraw requests are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Coalesce bursts of updates behind a short debounce timer. The
    /// default for interactive use.
    #[default]
    Debounced,
    /// Render synchronously on every state change. Deterministic; meant
    /// for reproducible tests against an in-memory terminal.
    Immediate,
}

/// Configuration for one finder session.
pub struct FinderOptions {
    /// Matching mode for the filter pass.
    pub mode: Mode,
    /// Preview panel content function; `None` disables the preview split.
    pub preview: Option<PreviewFn>,
    /// Explicit content width; `None` uses the full terminal width.
    pub width: Option<u16>,
    /// Explicit content height; when smaller than the terminal, the
    /// content block is anchored to the bottom. `None` uses full height.
    pub height: Option<u16>,
    /// Draw a one-cell border around the content block.
    pub border: bool,
    /// Header text shown above the counter row; empty disables the row.
    pub header: String,
    /// Prompt string shown before the query.
    pub prompt: String,
    /// Initial query text.
    pub query: String,
    /// Return immediately when exactly one candidate matches at startup.
    pub select_one: bool,
    /// Preselection predicate over candidate indices.
    pub preselect: Option<PreselectFn>,
    /// Start with the cursor on the top row instead of the bottom.
    pub begin_at_top: bool,
    /// External cancellation signal, observed by the event loop and the
    /// hot-reload task.
    pub cancel: Option<Arc<AtomicBool>>,
    /// Redraw scheduling policy.
    pub render: RenderMode,
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Smart,
            preview: None,
            width: None,
            height: None,
            border: false,
            header: String::new(),
            prompt: "> ".to_string(),
            query: String::new(),
            select_one: false,
            preselect: None,
            begin_at_top: false,
            cancel: None,
            render: RenderMode::default(),
        }
    }
}

impl FinderOptions {
    /// Validates the options at session construction.
    pub(crate) fn validate(&self) -> FindResult<()> {
        if self.width == Some(0) {
            return Err(FindError::InvalidArgument(
                "explicit width must be at least 1".to_string(),
            ));
        }
        if self.height == Some(0) {
            return Err(FindError::InvalidArgument(
                "explicit height must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the given candidate index starts out preselected.
    pub(crate) fn preselected(&self, index: usize) -> bool {
        self.preselect.as_ref().is_some_and(|f| f(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let o = FinderOptions::default();
        assert_eq!(o.prompt, "> ");
        assert_eq!(o.mode, Mode::Smart);
        assert!(!o.border && !o.select_one && !o.begin_at_top);
        assert!(o.width.is_none() && o.height.is_none());
        o.validate().unwrap();
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let o = FinderOptions {
            width: Some(0),
            ..FinderOptions::default()
        };
        assert!(matches!(o.validate(), Err(FindError::InvalidArgument(_))));

        let o = FinderOptions {
            height: Some(0),
            ..FinderOptions::default()
        };
        assert!(matches!(o.validate(), Err(FindError::InvalidArgument(_))));
    }
}
