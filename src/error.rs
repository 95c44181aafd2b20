//! Outcome and error types for a finder session.

use std::error::Error;
use std::fmt;
use std::io;

/// Result type for the embedding API.
pub type FindResult<T> = Result<T, FindError>;

/// Outcomes of a finder session that do not produce a selection.
///
/// `Abort` and `Cancelled` are expected terminal states, not failures in
/// the exceptional sense; they are errors only so that a caller can never
/// confuse "no selection" with a real candidate index.
#[derive(Debug)]
pub enum FindError {
    /// The user dismissed the finder, or committed with zero matches.
    Abort,
    /// The external cancellation signal fired before completion.
    Cancelled,
    /// The session options are malformed.
    InvalidArgument(String),
    /// The terminal backend could not be initialized. Fatal; the session
    /// never starts.
    TerminalInit(io::Error),
    /// The terminal backend failed mid-session.
    Io(io::Error),
}

impl fmt::Display for FindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindError::Abort => write!(f, "aborted with no selection"),
            FindError::Cancelled => write!(f, "cancelled"),
            FindError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            FindError::TerminalInit(e) => write!(f, "failed to initialize the terminal: {}", e),
            FindError::Io(e) => write!(f, "terminal I/O error: {}", e),
        }
    }
}

impl Error for FindError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FindError::TerminalInit(e) | FindError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FindError {
    fn from(e: io::Error) -> Self {
        FindError::Io(e)
    }
}

impl FindError {
    /// Reports whether the session ended without a selection by user
    /// choice (as opposed to a failure).
    pub fn is_abort(&self) -> bool {
        matches!(self, FindError::Abort)
    }
}
