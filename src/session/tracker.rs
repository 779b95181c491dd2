//! Follows the host's current document and keeps one session for it.
//!
//! The host calls `sync` whenever its active document may have changed. A
//! different path discards the old session, which releases its temporary
//! files, and opens a new one. A path with no repository leaves no session
//! behind, only a status; the next valid path recovers.

use std::path::PathBuf;

use crate::models::Status;
use crate::session::{DocumentProvider, TrackedDocument};

pub struct Tracker<P: DocumentProvider> {
    provider: P,
    subject: Option<PathBuf>,
    session: Option<TrackedDocument>,
    status: Status,
}

impl<P: DocumentProvider> Tracker<P> {
    pub fn new(provider: P) -> Self {
        let mut tracker = Self {
            provider,
            subject: None,
            session: None,
            status: Status::Idle,
        };
        tracker.reload();
        tracker
    }

    /// Re-read the provider. Returns true when the session was replaced.
    pub fn sync(&mut self) -> bool {
        let current = self.current_subject();
        if current == self.subject {
            return false;
        }

        self.reload();
        true
    }

    /// Rebuild the session for the current subject even if it did not change.
    pub fn reload(&mut self) {
        self.subject = self.current_subject();
        // Drop first so temporary files go away before the new session opens.
        self.session = None;

        let Some(path) = self.subject.clone() else {
            self.status = Status::Idle;
            return;
        };

        match TrackedDocument::open(&path) {
            Ok(session) => {
                self.status = Status::Idle;
                self.session = Some(session);
            }
            Err(e) => {
                tracing::info!("No session for {}: {}", path.display(), e);
                self.status = Status::from(&e);
            }
        }
    }

    pub fn session(&self) -> Option<&TrackedDocument> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut TrackedDocument> {
        self.session.as_mut()
    }

    /// The session's last outcome, or why there is no session.
    pub fn status(&self) -> &Status {
        match &self.session {
            Some(session) => session.status(),
            None => &self.status,
        }
    }

    fn current_subject(&self) -> Option<PathBuf> {
        self.provider
            .current_path()
            .filter(|p| !p.as_os_str().is_empty())
    }
}
