//! Working-tree access.
//!
//! All paths handed out and accepted here are repo-relative and
//! forward-slash normalized. Enumeration honors the ignore rules; file
//! handles are scoped to single calls.

use crate::artifacts::ignore::IgnoreRules;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const CONFLICT_MARKER_OURS: &str = "<<<<<<< HEAD";
const CONFLICT_MARKER_SEPARATOR: &str = "=======";
const CONFLICT_MARKER_THEIRS: &str = ">>>>>>>";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn root(&self) -> &Path {
        &self.path
    }

    fn absolute(&self, path: &str) -> PathBuf {
        self.path.join(path)
    }

    /// Enumerate tracked-able files: regular files under the root, ignore
    /// rules applied, sorted for deterministic downstream output.
    pub fn list_files(&self, ignore: &IgnoreRules) -> anyhow::Result<Vec<String>> {
        let mut files: Vec<String> = WalkDir::new(self.path.as_ref())
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(self.path.as_ref()).ok()?;
                Some(relative.to_string_lossy().replace('\\', "/"))
            })
            .filter(|path| !ignore.is_ignored(path))
            .collect();
        files.sort();
        Ok(files)
    }

    pub fn exists(&self, path: &str) -> bool {
        self.absolute(path).exists()
    }

    pub fn is_file(&self, path: &str) -> bool {
        self.absolute(path).is_file()
    }

    pub fn read_file(&self, path: &str) -> anyhow::Result<Bytes> {
        let absolute = self.absolute(path);
        let content = std::fs::read(&absolute)
            .with_context(|| format!("unable to read {}", absolute.display()))?;
        Ok(Bytes::from(content))
    }

    /// Write a file, creating parent directories.
    pub fn write_file(&self, path: &str, content: &[u8]) -> anyhow::Result<()> {
        let absolute = self.absolute(path);
        if let Some(parent) = absolute.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("unable to create {}", parent.display()))?;
        }
        std::fs::write(&absolute, content)
            .with_context(|| format!("unable to write {}", absolute.display()))
    }

    pub fn delete_file(&self, path: &str) -> anyhow::Result<()> {
        let absolute = self.absolute(path);
        if absolute.exists() {
            std::fs::remove_file(&absolute)
                .with_context(|| format!("unable to delete {}", absolute.display()))?;
        }
        Ok(())
    }

    /// Blob id a working file would have, computed over the same canonical
    /// blob encoding used by the store.
    pub fn hash_file(&self, path: &str) -> anyhow::Result<ObjectId> {
        let content = self.read_file(path)?;
        Blob::new(content).object_id()
    }

    /// A file is conflicted iff it contains the three conflict markers in
    /// order.
    pub fn has_conflict_markers(&self, path: &str) -> anyhow::Result<bool> {
        let content = self.read_file(path)?;
        let text = String::from_utf8_lossy(&content);

        let Some(ours_at) = text.find(CONFLICT_MARKER_OURS) else {
            return Ok(false);
        };
        let Some(separator_at) = text[ours_at..].find(CONFLICT_MARKER_SEPARATOR) else {
            return Ok(false);
        };
        let after_separator = ours_at + separator_at + CONFLICT_MARKER_SEPARATOR.len();
        Ok(text[after_separator..].contains(CONFLICT_MARKER_THEIRS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> (assert_fs::TempDir, Workspace) {
        let dir = assert_fs::TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());
        (dir, workspace)
    }

    #[test]
    fn listing_skips_ignored_paths_and_sorts() {
        let (_dir, ws) = workspace();
        ws.write_file("b.txt", b"b").unwrap();
        ws.write_file("a/1.txt", b"1").unwrap();
        ws.write_file(".dit/HEAD", b"ref: refs/heads/master\n").unwrap();
        ws.write_file("target/out", b"x").unwrap();

        let files = ws.list_files(&IgnoreRules::default()).unwrap();
        assert_eq!(files, vec!["a/1.txt".to_string(), "b.txt".to_string()]);
    }

    #[test]
    fn marker_detection_requires_all_three_in_order() {
        let (_dir, ws) = workspace();
        ws.write_file("c.txt", b"<<<<<<< HEAD\nB\n=======\nA\n>>>>>>> c.txt\n")
            .unwrap();
        ws.write_file("plain.txt", b">>>>>>> first\n=======\n<<<<<<< HEAD\n")
            .unwrap();

        assert!(ws.has_conflict_markers("c.txt").unwrap());
        assert!(!ws.has_conflict_markers("plain.txt").unwrap());
    }
}
