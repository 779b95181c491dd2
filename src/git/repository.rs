use git2::Repository;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::CommitRecord;

/// A repository discovered from a tracked file, together with its working tree root.
pub struct GitRepository {
    pub(crate) repo: Repository,
    workdir: PathBuf,
}

impl GitRepository {
    /// Find the repository enclosing `path` by searching its ancestor directories.
    pub fn locate<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(AppError::InvalidPath("no file selected".to_string()));
        }

        let path = std::path::absolute(path)
            .map_err(|_| AppError::InvalidPath(path.display().to_string()))?;
        let path_str = path.to_string_lossy().to_string();

        let start = if path.is_dir() {
            path.as_path()
        } else {
            path.parent().unwrap_or(path.as_path())
        };

        let repo = Repository::discover(start).map_err(|_| AppError::NotARepository(path_str.clone()))?;

        // Bare repositories have no working tree to track files in.
        let workdir = repo
            .workdir()
            .ok_or_else(|| AppError::NotARepository(path_str.clone()))?;
        let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());

        let located = Self { repo, workdir };
        located.relative_path(&path)?;

        tracing::debug!("Located repository {} for {}", located.workdir.display(), path_str);
        Ok(located)
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Path of `path` relative to the working tree, `/`-separated as git stores it.
    pub fn relative_path(&self, path: &Path) -> Result<String> {
        let absolute = canonical_file_path(path);
        let rel = absolute
            .strip_prefix(&self.workdir)
            .map_err(|_| AppError::NotARepository(path.display().to_string()))?;

        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();

        if parts.is_empty() {
            return Err(AppError::InvalidPath(format!(
                "{} is the working tree root",
                path.display()
            )));
        }

        Ok(parts.join("/"))
    }
}

/// Resolve symlinks in the parent directory only, so the file itself may be
/// missing or be a tracked symlink.
fn canonical_file_path(path: &Path) -> PathBuf {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    if path.is_dir() {
        return path.canonicalize().unwrap_or(path);
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|p| p.join(name))
            .unwrap_or_else(|_| path.clone()),
        _ => path,
    }
}

pub fn commit_to_record(commit: &git2::Commit) -> CommitRecord {
    let timestamp = commit.time().seconds();
    CommitRecord {
        id: commit.id().to_string(),
        summary: commit.summary().unwrap_or("").to_string(),
        message: commit.message().unwrap_or("").trim().to_string(),
        author: commit.author().name().unwrap_or("Unknown").to_string(),
        timestamp,
        relative_time: format_relative_time(timestamp),
    }
}

pub fn format_relative_time(timestamp: i64) -> String {
    relative_time_between(chrono::Utc::now().timestamp(), timestamp)
}

fn relative_time_between(now: i64, timestamp: i64) -> String {
    let diff = now - timestamp;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}
