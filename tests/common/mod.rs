#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

/// A throwaway repository with a configured identity.
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test").unwrap();
            config.set_str("user.email", "test@test.com").unwrap();
        }
        Self { dir, repo }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, bytes).unwrap();
        path
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.path(rel)).unwrap();
    }

    /// Stage `rel` and leave it in the index without committing.
    pub fn stage(&self, rel: &str) {
        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(rel)).unwrap();
        index.write().unwrap();
    }

    /// Stage the given paths (adding or removing) and commit them.
    pub fn commit(&self, rels: &[&str], message: &str) -> Oid {
        let mut index = self.repo.index().unwrap();
        for rel in rels {
            if self.path(rel).exists() {
                index.add_path(Path::new(rel)).unwrap();
            } else {
                index.remove_path(Path::new(rel)).unwrap();
            }
        }
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Test", "test@test.com").unwrap();
        let parent = self.repo.head().ok().map(|h| h.peel_to_commit().unwrap());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    /// Write `rel` and commit it in one step.
    pub fn commit_file(&self, rel: &str, bytes: &[u8], message: &str) -> Oid {
        self.write(rel, bytes);
        self.commit(&[rel], message)
    }

    pub fn head_id(&self) -> Option<String> {
        self.repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .map(|c| c.id().to_string())
    }

    pub fn commit_count(&self) -> usize {
        if self.repo.head().is_err() {
            return 0;
        }
        let mut revwalk = self.repo.revwalk().unwrap();
        revwalk.push_head().unwrap();
        revwalk.count()
    }

    /// Paths changed by `oid` relative to its first parent.
    pub fn changed_paths(&self, oid: &str) -> Vec<String> {
        let commit = self.repo.find_commit(Oid::from_str(oid).unwrap()).unwrap();
        let tree = commit.tree().unwrap();
        let parent_tree = commit.parent(0).ok().map(|p| p.tree().unwrap());
        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
            .unwrap();

        diff.deltas()
            .filter_map(|d| d.new_file().path().or(d.old_file().path()))
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    /// Blob id staged for `rel`, re-read from disk.
    pub fn staged_id(&self, rel: &str) -> Option<Oid> {
        let mut index = self.repo.index().unwrap();
        index.read(true).unwrap();
        index.get_path(Path::new(rel), 0).map(|entry| entry.id)
    }

    pub fn status_of(&self, rel: &str) -> git2::Status {
        self.repo.status_file(Path::new(rel)).unwrap()
    }
}

pub fn png(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn stored() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored)
}

/// A minimal `.kra`-shaped archive.
pub fn kra(merged: Option<&[u8]>, preview: Option<&[u8]>) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));

    writer.start_file("mimetype", stored()).unwrap();
    writer.write_all(b"application/x-krita").unwrap();
    writer.start_file("maindoc.xml", stored()).unwrap();
    writer.write_all(b"<DOC/>\n").unwrap();

    if let Some(merged) = merged {
        writer.start_file("mergedimage.png", stored()).unwrap();
        writer.write_all(merged).unwrap();
    }
    if let Some(preview) = preview {
        writer.start_file("preview.png", stored()).unwrap();
        writer.write_all(preview).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

pub fn is_red(pixel: Rgba<u8>) -> bool {
    pixel[0] > 200 && pixel[2] < 50
}

pub fn is_blue(pixel: Rgba<u8>) -> bool {
    pixel[2] > 200 && pixel[0] < 50
}
