//! Per-file sessions.
//!
//! - `provider`: the injected "current document" capability
//! - `document`: `TrackedDocument`, one file's history, previews and commits
//! - `tracker`: swaps sessions when the current document changes

pub mod document;
pub mod provider;
pub mod tracker;

pub use document::TrackedDocument;
pub use provider::{DocumentProvider, FixedDocument};
pub use tracker::Tracker;
