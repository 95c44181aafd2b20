//! # fzsel - Embeddable Fuzzy-Selection Engine
//!
//! fzsel is the interactive core behind terminal pickers: given a list of
//! candidates, it lets a user type a query, see live-filtered matches,
//! navigate, optionally multi-select, and commit or abort. Host
//! applications embed it as a library call; it is not a standalone tool.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`score`] - Similarity scoring (local alignment with affine gaps)
//! - [`matcher`] - Per-keystroke subsequence filtering over candidate labels
//! - [`layout`] - Pure terminal-geometry solver
//! - [`finder`] - Session state machine, event loop and embedding API
//! - [`config`] - Per-session options
//! - [`term`] - Terminal backend boundary (crossterm and an in-memory mock)
//!
//! ## Quick Start
//!
//! ```ignore
//! use fzsel::{find, FinderOptions, Source};
//!
//! let tracks = vec!["foo", "bar", "foobar"];
//! match find(Source::Static(&tracks), |t| t.to_string(), FinderOptions::default()) {
//!     Ok(index) => println!("picked {}", tracks[index]),
//!     Err(e) if e.is_abort() => println!("nothing picked"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
//! ## Behavior notes
//!
//! The filtered list preserves the original candidate order; the
//! similarity score is computed for display but never reorders results.
//! Multi-select output is ordered by selection order, not index order.
//! With [`Source::HotReload`] the host may keep appending candidates
//! while the finder runs; the list re-filters live.

pub mod config;
pub mod error;
pub mod finder;
pub mod layout;
pub mod matcher;
pub mod score;
pub mod term;

pub use config::{FinderOptions, PreselectFn, PreviewFn, RenderMode};
pub use error::{FindError, FindResult};
pub use finder::{Finder, Source, find, find_multi};
pub use matcher::{MatchResult, Mode, filter};
pub use score::score;
