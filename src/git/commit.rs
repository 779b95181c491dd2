use git2::build::TreeUpdateBuilder;
use git2::{Commit, ErrorCode, FileMode, Signature, Tree};
use std::path::Path;

use crate::error::{AppError, Result};
use crate::git::repository::{GitRepository, commit_to_record};
use crate::models::CommitOutcome;

const FALLBACK_NAME: &str = "git-docker";
const FALLBACK_EMAIL: &str = "git-docker@localhost";

impl GitRepository {
    /// Stage `path` and commit it on top of HEAD.
    ///
    /// The new tree is HEAD's tree with only this one path replaced, so other
    /// changes sitting in the index are left staged but are not committed.
    /// HEAD is updated only if it still points at the parent read here.
    pub fn commit_path(&self, path: &Path, message: &str) -> Result<CommitOutcome> {
        if message.trim().is_empty() {
            return Ok(CommitOutcome::EmptyMessage);
        }

        let rel_path = self.relative_path(path)?;
        if !self.is_committable(path)? {
            return Ok(CommitOutcome::NotModified);
        }

        let parent = self.head_commit()?;
        let base_tree = match &parent {
            Some(commit) => commit.tree()?,
            None => self.empty_tree()?,
        };
        let base_entry = base_tree.get_path(Path::new(&rel_path)).ok();

        let full_path = self.workdir().join(&rel_path);
        let mut index = self.repo.index()?;
        let mut update = TreeUpdateBuilder::new();

        if let Ok(metadata) = std::fs::symlink_metadata(&full_path) {
            // Compare before staging so an unchanged file leaves the index alone.
            let blob = self.repo.blob_path(&full_path)?;
            let base_mode = base_entry.as_ref().map(|e| e.filemode());
            let mode = self.worktree_mode(&metadata, base_mode)?;
            let unchanged = base_entry
                .as_ref()
                .is_some_and(|e| e.id() == blob && e.filemode() == mode);
            if unchanged {
                return Ok(CommitOutcome::NotModified);
            }

            index.add_path(Path::new(&rel_path))?;
            let entry = index
                .get_path(Path::new(&rel_path), 0)
                .ok_or_else(|| AppError::InvalidPath(format!("{} could not be staged", rel_path)))?;
            update.upsert(rel_path.as_str(), entry.id, file_mode(entry.mode));
        } else {
            if base_entry.is_none() {
                return Ok(CommitOutcome::NotModified);
            }
            index.remove_path(Path::new(&rel_path))?;
            update.remove(rel_path.as_str());
        }
        index.write()?;

        let tree_oid = update.create_updated(&self.repo, &base_tree)?;
        let tree = self.repo.find_tree(tree_oid)?;
        let signature = self.signature()?;
        let parents: Vec<&Commit> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        let commit = self.repo.find_commit(oid)?;

        tracing::info!("Committed {} as {}", rel_path, oid);
        Ok(CommitOutcome::Committed(commit_to_record(&commit)))
    }

    /// Mode the index would record for a working tree file. With
    /// `core.filemode` off the executable bit is taken from HEAD.
    fn worktree_mode(&self, metadata: &std::fs::Metadata, base_mode: Option<i32>) -> Result<i32> {
        if metadata.file_type().is_symlink() {
            return Ok(i32::from(FileMode::Link));
        }

        let trust_filemode = self.repo.config()?.get_bool("core.filemode").unwrap_or(true);
        let executable = if trust_filemode {
            is_executable(metadata)
        } else {
            base_mode == Some(i32::from(FileMode::BlobExecutable))
        };

        Ok(i32::from(if executable { FileMode::BlobExecutable } else { FileMode::Blob }))
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn empty_tree(&self) -> Result<Tree<'_>> {
        let oid = self.repo.treebuilder(None)?.write()?;
        Ok(self.repo.find_tree(oid)?)
    }

    fn signature(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(signature) => Ok(signature),
            Err(e) => {
                tracing::warn!("No git identity configured ({}), committing as {}", e.message(), FALLBACK_NAME);
                Ok(Signature::now(FALLBACK_NAME, FALLBACK_EMAIL)?)
            }
        }
    }
}

fn file_mode(mode: u32) -> FileMode {
    match mode {
        0o100755 => FileMode::BlobExecutable,
        0o120000 => FileMode::Link,
        0o160000 => FileMode::Commit,
        _ => FileMode::Blob,
    }
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    false
}
