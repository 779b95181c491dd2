//! Application error types.
//!
//! `AppError` covers the faults that can escape an operation. Expected
//! outcomes (a path missing at a revision, no preview, an empty commit
//! message, an unchanged file) are not errors and never appear here; they are
//! returned as `Option` or as outcome enums from `models`.
//!
//! Error mappings to the status line live in `models::status`:
//! - `InvalidPath`, `NotARepository` → "Git repository not found"
//! - everything else → the error's own message

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Not a git repository: {0}")]
    NotARepository(String),

    #[error("Commit not found: {0}")]
    CommitNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, AppError>;
