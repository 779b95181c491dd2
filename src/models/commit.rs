use serde::Serialize;

/// One commit that touched the tracked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    /// Full hex object id.
    pub id: String,
    /// First line of the message.
    pub summary: String,
    pub message: String,
    pub author: String,
    pub timestamp: i64,
    pub relative_time: String,
}

/// Result of a commit attempt.
///
/// The guard conditions are ordinary variants so that callers can branch on
/// them without treating a blank message box as a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed(CommitRecord),
    EmptyMessage,
    NotModified,
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed(_))
    }
}
