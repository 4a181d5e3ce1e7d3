//! The index (staging area).
//!
//! Persisted as a flat text file, one `path=hash` line per entry. An empty
//! hash stages a deletion. Entry order is irrelevant for semantics but the
//! on-disk order follows insertion order so rewrites are deterministic.
//!
//! Paths are repo-relative and forward-slash normalized; `..` segments and
//! leading slashes are rejected before anything reaches this file.

use crate::areas::write_atomic;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub path: String,
    /// `None` marks a staged deletion.
    pub oid: Option<ObjectId>,
}

#[derive(Debug, Clone)]
pub struct Index {
    path: Box<Path>,
    entries: Vec<IndexEntry>,
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: Vec::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload the index from disk, tolerating a missing or empty file.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("unable to read index at {}", self.path.display()))?;
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let Some((path, hash)) = line.split_once('=') else {
                continue;
            };
            if path.is_empty() {
                continue;
            }
            let oid = if hash.is_empty() {
                None
            } else {
                Some(ObjectId::try_parse(hash.to_string())?)
            };
            self.entries.push(IndexEntry {
                path: path.to_string(),
                oid,
            });
        }

        Ok(())
    }

    pub fn entry(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.iter().find(|entry| entry.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entry(path).is_some()
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Stage content (or a deletion, with `None`) for a path. An existing
    /// entry is updated in place so the file keeps its insertion order.
    pub fn stage(&mut self, path: String, oid: Option<ObjectId>) {
        match self.entries.iter_mut().find(|entry| entry.path == path) {
            Some(entry) => {
                if entry.oid != oid {
                    entry.oid = oid;
                    self.changed = true;
                }
            }
            None => {
                self.entries.push(IndexEntry { path, oid });
                self.changed = true;
            }
        }
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.changed = true;
        }
    }

    /// Persist the index atomically.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut content = String::new();
        for entry in &self.entries {
            let hash = entry
                .oid
                .as_ref()
                .map(|oid| oid.to_string())
                .unwrap_or_default();
            content.push_str(&format!("{}={}\n", entry.path, hash));
        }

        write_atomic(&self.path, content.as_bytes())?;
        self.changed = false;
        Ok(())
    }
}
