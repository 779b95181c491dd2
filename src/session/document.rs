//! One tracked file and everything the history panel can do with it.
//!
//! A `TrackedDocument` is built when a file becomes the subject of interest
//! and dropped when the subject changes. The repository handle and the commit
//! list are resolved fresh on every construction; nothing is cached between
//! sessions.
//!
//! Revisions opened as documents are written to temporary files owned by the
//! session. They are deleted when the session is dropped or closed.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{AppError, Result};
use crate::git::{GitRepository, HISTORY_LIMIT};
use crate::models::{CommitOutcome, CommitRecord, Preview, Status, Unavailable};
use crate::session::DocumentProvider;
use crate::thumbnail;

pub struct TrackedDocument {
    path: PathBuf,
    repo: GitRepository,
    commits: Vec<CommitRecord>,
    materialized: Vec<NamedTempFile>,
    status: Status,
}

impl TrackedDocument {
    /// Locate the repository for `path` and load its recent history.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let repo = GitRepository::locate(&path)?;
        let path = std::path::absolute(&path)?;

        let mut document = Self {
            path,
            repo,
            commits: Vec::new(),
            materialized: Vec::new(),
            status: Status::Idle,
        };
        document.refresh()?;
        Ok(document)
    }

    /// Open a session for whatever the provider reports as current.
    pub fn from_provider(provider: &dyn DocumentProvider) -> Result<Self> {
        let path = provider
            .current_path()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| AppError::InvalidPath("no file selected".to_string()))?;
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repository(&self) -> &GitRepository {
        &self.repo
    }

    /// Newest first, at most `HISTORY_LIMIT` entries.
    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    /// `(revision id, summary)` pairs for a revision selector.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        self.commits
            .iter()
            .map(|c| (c.id.as_str(), c.summary.as_str()))
            .collect()
    }

    /// False when no commit has ever touched the file.
    pub fn is_tracked(&self) -> bool {
        !self.commits.is_empty()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Reload the commit list from the repository.
    pub fn refresh(&mut self) -> Result<()> {
        let commits = self.repo.list_commits(&self.path, HISTORY_LIMIT);
        self.commits = self.record(commits)?;
        self.status = if self.commits.is_empty() {
            Status::NotTracked
        } else {
            Status::Idle
        };
        Ok(())
    }

    /// Exact bytes of the file at `revision`, `None` if it did not exist there.
    pub fn content(&mut self, revision: &str) -> Result<Option<Vec<u8>>> {
        let content = self.repo.get_content(&self.path, revision);
        self.record(content)
    }

    pub fn preview(&mut self, revision: &str) -> Result<Preview> {
        let preview = match self.content(revision)? {
            None => Preview::Unavailable(Unavailable::MissingAtRevision),
            Some(bytes) => match thumbnail::extract(&bytes, &self.path) {
                Some(image) => Preview::Ready(image),
                None => Preview::Unavailable(Unavailable::NoPreview),
            },
        };

        self.status = match preview {
            Preview::Ready(_) => Status::Idle,
            Preview::Unavailable(_) => Status::NoThumbnail,
        };
        Ok(preview)
    }

    /// Write `revision` to a temporary file the host can open.
    ///
    /// The file keeps the tracked file's extension and lives until the session
    /// ends. Returns `None` if the file did not exist at that revision.
    pub fn materialize(&mut self, revision: &str) -> Result<Option<PathBuf>> {
        let Some(bytes) = self.content(revision)? else {
            return Ok(None);
        };

        let written = write_temp_copy(&self.path, revision, &bytes);
        let file = self.record(written)?;
        let path = file.path().to_path_buf();

        tracing::info!("Materialized {} at {} into {}", self.path.display(), revision, path.display());
        self.materialized.push(file);
        Ok(Some(path))
    }

    /// Paths of every revision materialized by this session so far.
    pub fn materialized(&self) -> impl Iterator<Item = &Path> {
        self.materialized.iter().map(|f| f.path())
    }

    /// Delete all materialized copies now instead of at session end.
    pub fn release_materialized(&mut self) -> Result<()> {
        let mut first_error = None;
        for file in self.materialized.drain(..) {
            if let Err(e) = file.close() {
                tracing::warn!("Failed to remove temporary revision: {}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    pub fn is_committable(&mut self) -> Result<bool> {
        let committable = self.repo.is_committable(&self.path);
        self.record(committable)
    }

    /// Commit the working tree version of the file and reload the history.
    pub fn commit(&mut self, message: &str) -> Result<CommitOutcome> {
        let outcome = self.repo.commit_path(&self.path, message);
        let outcome = self.record(outcome)?;

        if outcome.is_committed() {
            self.refresh()?;
        }
        self.status = Status::from(&outcome);
        Ok(outcome)
    }

    /// End the session, reporting any failure to remove temporary files.
    pub fn close(mut self) -> Result<()> {
        self.release_materialized()
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.status = Status::from(e);
        }
        result
    }
}

fn write_temp_copy(path: &Path, revision: &str, bytes: &[u8]) -> Result<NamedTempFile> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "revision".to_string());
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    // Revisions like `HEAD~1` or `main/topic` must not leak separators into the name.
    let short: String = revision
        .chars()
        .take(8)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    let mut file = tempfile::Builder::new()
        .prefix(&format!("{}-{}-", stem, short))
        .suffix(&suffix)
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}
