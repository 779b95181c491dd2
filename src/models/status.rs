//! Status line shown next to the revision selector.
//!
//! Every operation on a session leaves one of these behind so a front end can
//! display a short summary of what last happened.

use std::fmt;

use crate::error::AppError;
use crate::models::CommitOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    RepositoryNotFound,
    NotTracked,
    NoThumbnail,
    EmptyMessage,
    NotModified,
    Committed,
    Failed(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => f.write_str(""),
            Status::RepositoryNotFound => f.write_str("Git repository not found"),
            Status::NotTracked => f.write_str("This file is not tracked"),
            Status::NoThumbnail => f.write_str("No thumbnail available"),
            Status::EmptyMessage => f.write_str("Commit message is empty"),
            Status::NotModified => f.write_str("File is not changed"),
            Status::Committed => f.write_str("Committed."),
            Status::Failed(msg) => f.write_str(msg),
        }
    }
}

impl From<&AppError> for Status {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::InvalidPath(_) | AppError::NotARepository(_) => Status::RepositoryNotFound,
            other => Status::Failed(other.to_string()),
        }
    }
}

impl From<&CommitOutcome> for Status {
    fn from(outcome: &CommitOutcome) -> Self {
        match outcome {
            CommitOutcome::Committed(_) => Status::Committed,
            CommitOutcome::EmptyMessage => Status::EmptyMessage,
            CommitOutcome::NotModified => Status::NotModified,
        }
    }
}
