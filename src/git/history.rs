use git2::{DiffOptions, ErrorCode, Oid, Repository, Revwalk, Sort, Tree};
use std::path::Path;

use crate::error::Result;
use crate::git::repository::{GitRepository, commit_to_record};
use crate::models::CommitRecord;

/// Number of revisions offered for one file.
pub const HISTORY_LIMIT: usize = 10;

/// Newest-first walk over the commits reachable from HEAD that changed one path.
///
/// The walk is lazy and single-use; it stops for good after the first error.
pub struct PathHistory<'repo> {
    repo: &'repo Repository,
    revwalk: Option<Revwalk<'repo>>,
    path: String,
}

impl Iterator for PathHistory<'_> {
    type Item = Result<CommitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let revwalk = self.revwalk.as_mut()?;

        let failed = loop {
            match revwalk.next() {
                None => break None,
                Some(oid) => match record_if_touched(self.repo, &self.path, oid) {
                    Ok(Some(record)) => return Some(Ok(record)),
                    Ok(None) => continue,
                    Err(e) => break Some(Err(e)),
                },
            }
        };

        self.revwalk = None;
        failed
    }
}

impl GitRepository {
    /// Start a history walk for `path`. A repository without commits yields nothing.
    pub fn history(&self, path: &Path) -> Result<PathHistory<'_>> {
        let rel_path = self.relative_path(path)?;

        let revwalk = match self.repo.head() {
            Ok(_) => {
                let mut revwalk = self.repo.revwalk()?;
                revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
                revwalk.push_head()?;
                Some(revwalk)
            }
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
            Err(e) => return Err(e.into()),
        };

        Ok(PathHistory {
            repo: &self.repo,
            revwalk,
            path: rel_path,
        })
    }

    /// The `limit` most recent commits that changed `path`, newest first.
    pub fn list_commits(&self, path: &Path, limit: usize) -> Result<Vec<CommitRecord>> {
        let start = std::time::Instant::now();
        let commits = self.history(path)?.take(limit).collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "Loaded {} commits for {} in {:?}",
            commits.len(),
            path.display(),
            start.elapsed()
        );
        Ok(commits)
    }
}

fn record_if_touched(
    repo: &Repository,
    path: &str,
    oid: std::result::Result<Oid, git2::Error>,
) -> Result<Option<CommitRecord>> {
    let commit = repo.find_commit(oid?)?;

    if commit_touches_path(repo, &commit, path)? {
        Ok(Some(commit_to_record(&commit)))
    } else {
        Ok(None)
    }
}

/// True when `path` differs between the commit and every one of its parents.
///
/// Merges that kept one side's version of the file unchanged are skipped,
/// matching `git log -- <path>`.
fn commit_touches_path(repo: &Repository, commit: &git2::Commit, path: &str) -> Result<bool> {
    let tree = commit.tree()?;

    if commit.parent_count() == 0 {
        return diff_touches_path(repo, None, &tree, path);
    }

    for parent in commit.parents() {
        let parent_tree = parent.tree()?;
        if !diff_touches_path(repo, Some(&parent_tree), &tree, path)? {
            return Ok(false);
        }
    }

    Ok(true)
}

fn diff_touches_path(repo: &Repository, old: Option<&Tree>, new: &Tree, path: &str) -> Result<bool> {
    let mut opts = DiffOptions::new();
    opts.pathspec(path);
    // No glob or sibling-prefix matching. A directory that once had this
    // name still matches, as in `git log -- <path>`.
    opts.disable_pathspec_match(true);

    let diff = repo.diff_tree_to_tree(old, Some(new), Some(&mut opts))?;

    Ok(diff.deltas().len() > 0)
}
