use git2::{ErrorCode, ObjectType};
use std::path::Path;

use crate::error::{AppError, Result};
use crate::git::repository::GitRepository;

impl GitRepository {
    /// Raw bytes of `path` as stored at `revision`, or `None` if the file did
    /// not exist there.
    ///
    /// Reads the blob straight from the object database: no newline trimming,
    /// no eol or smudge filters. Container formats depend on exact framing.
    pub fn get_content(&self, path: &Path, revision: &str) -> Result<Option<Vec<u8>>> {
        let rel_path = self.relative_path(path)?;

        let commit = self
            .repo
            .revparse_single(revision)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|_| AppError::CommitNotFound(revision.to_string()))?;
        let tree = commit.tree()?;

        let entry = match tree.get_path(Path::new(&rel_path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => {
                tracing::debug!("{} does not exist at {}", rel_path, revision);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if entry.kind() != Some(ObjectType::Blob) {
            return Ok(None);
        }

        let blob = self.repo.find_blob(entry.id())?;
        let content = blob.content().to_vec();

        tracing::debug!("Read {} bytes of {} at {}", content.len(), rel_path, revision);
        Ok(Some(content))
    }
}
