//! Working tree modification status.
//!
//! Mirrors `git ls-files --others --exclude-standard` (untracked) and
//! `git diff HEAD --name-only` (changed). The changed set compares HEAD's tree
//! with the working tree directly, so whatever is staged in between does not
//! count. Never cached: the working tree may change between two calls.

use git2::{Delta, DiffOptions, ErrorCode, StatusOptions};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::Result;
use crate::git::repository::GitRepository;

/// Paths, relative to the working tree, that a commit would change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModificationStatus {
    pub untracked: BTreeSet<String>,
    pub changed: BTreeSet<String>,
}

impl ModificationStatus {
    pub fn contains(&self, rel_path: &str) -> bool {
        self.untracked.contains(rel_path) || self.changed.contains(rel_path)
    }
}

impl GitRepository {
    pub fn modification_status(&self) -> Result<ModificationStatus> {
        let mut status = ModificationStatus {
            untracked: self.untracked_paths()?,
            changed: BTreeSet::new(),
        };

        let head_tree = match self.repo.head() {
            Ok(head) => Some(head.peel_to_tree()?),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
            Err(e) => return Err(e.into()),
        };

        let mut opts = DiffOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .include_typechange(true)
            .ignore_submodules(true);

        let diff = self.repo.diff_tree_to_workdir(head_tree.as_ref(), Some(&mut opts))?;

        for delta in diff.deltas() {
            let Some(path) = delta.new_file().path().or(delta.old_file().path()) else {
                continue;
            };
            let path = path.to_string_lossy().replace('\\', "/");

            match delta.status() {
                Delta::Unmodified | Delta::Ignored | Delta::Unreadable => {}
                // Absent from HEAD but staged: `git diff HEAD` reports it as added.
                Delta::Untracked if status.untracked.contains(&path) => {}
                _ => {
                    status.changed.insert(path);
                }
            }
        }

        Ok(status)
    }

    /// Working tree files that are neither in the index nor ignored.
    fn untracked_paths(&self) -> Result<BTreeSet<String>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(statuses
            .iter()
            .filter(|entry| entry.status().is_wt_new())
            .map(|entry| String::from_utf8_lossy(entry.path_bytes()).to_string())
            .collect())
    }

    /// Whether committing `path` would record anything.
    pub fn is_committable(&self, path: &Path) -> Result<bool> {
        let rel_path = self.relative_path(path)?;
        let status = self.modification_status()?;
        let committable = status.contains(&rel_path);

        tracing::debug!("{} committable: {}", rel_path, committable);
        Ok(committable)
    }
}
