//! History, previews and commits for a single document in a git repository.
//!
//! - `git`: repository discovery, per-file history, raw blob content,
//!   modification status and single-path commits
//! - `thumbnail`: preview images from plain images and zip-based painting formats
//! - `session`: `TrackedDocument`, the per-file session, and `Tracker`
//! - `models`: records, outcomes and status text handed to front ends

pub mod error;
pub mod git;
pub mod models;
pub mod session;
pub mod thumbnail;

pub use error::{AppError, Result};
pub use git::{GitRepository, HISTORY_LIMIT};
pub use models::{CommitOutcome, CommitRecord, Preview, Status, Unavailable};
pub use session::{DocumentProvider, FixedDocument, TrackedDocument, Tracker};
pub use thumbnail::ThumbnailImage;
