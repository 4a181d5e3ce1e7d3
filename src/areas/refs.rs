//! HEAD and branch references.
//!
//! `HEAD` is either symbolic (`ref: refs/heads/<name>`) or detached (a bare
//! commit hash). A symbolic HEAD may point at a ref file that does not exist
//! yet; that is an unborn branch and resolves to no commit. Ref updates are
//! whole-file replacements through write-temp-then-rename, and they happen
//! last within a command, so a crash can lose the operation but never
//! corrupt earlier history.

use crate::areas::write_atomic;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::DitError;
use anyhow::Context;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const HEAD_FILE: &str = "HEAD";
pub const HEADS_PREFIX: &str = "refs/heads";

const SYMREF_PATTERN: &str = r"^ref: (.+)$";

/// Raw content of the HEAD file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// HEAD names a ref path such as `refs/heads/master`.
    Symbolic(String),
    /// HEAD carries a commit hash directly.
    Detached(ObjectId),
}

#[derive(Debug)]
pub struct Refs {
    /// The metadata directory holding HEAD and refs/.
    path: Box<Path>,
}

impl Refs {
    pub fn new(path: Box<Path>) -> Self {
        Refs { path }
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_FILE)
    }

    fn ref_file(&self, ref_path: &str) -> PathBuf {
        self.path.join(ref_path)
    }

    pub fn branch_ref_path(name: &str) -> String {
        format!("{HEADS_PREFIX}/{name}")
    }

    /// Read HEAD without resolving it.
    pub fn read_head_raw(&self) -> anyhow::Result<Head> {
        let head_path = self.head_path();
        if !head_path.exists() {
            anyhow::bail!(DitError::NotARepo);
        }
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("unable to read {}", head_path.display()))?;
        let content = content.trim();

        let symref = Regex::new(SYMREF_PATTERN).expect("symref pattern is valid");
        if let Some(captures) = symref.captures(content) {
            Ok(Head::Symbolic(captures[1].trim().to_string()))
        } else {
            Ok(Head::Detached(ObjectId::try_parse(content.to_string())?))
        }
    }

    /// Resolve HEAD to a commit id, following one symbolic level.
    /// Returns `None` on an unborn branch.
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        match self.read_head_raw()? {
            Head::Symbolic(ref_path) => self.read_ref(&ref_path),
            Head::Detached(oid) => Ok(Some(oid)),
        }
    }

    /// Read a ref file, returning its trimmed commit id. Missing files and
    /// empty files (branches created from an unborn HEAD) yield `None`.
    pub fn read_ref(&self, ref_path: &str) -> anyhow::Result<Option<ObjectId>> {
        let path = self.ref_file(ref_path);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("unable to read ref {ref_path}"))?;
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }
        Ok(Some(ObjectId::try_parse(content.to_string())?))
    }

    /// Point a ref at a commit, creating parent directories as needed.
    pub fn update_ref(&self, ref_path: &str, oid: &ObjectId) -> anyhow::Result<()> {
        write_atomic(&self.ref_file(ref_path), format!("{oid}\n").as_bytes())
    }

    /// Make HEAD symbolic.
    pub fn set_head_to_ref(&self, ref_path: &str) -> anyhow::Result<()> {
        write_atomic(&self.head_path(), format!("ref: {ref_path}\n").as_bytes())
    }

    /// Detach HEAD at a commit.
    pub fn set_head_detached(&self, oid: &ObjectId) -> anyhow::Result<()> {
        write_atomic(&self.head_path(), format!("{oid}\n").as_bytes())
    }

    /// Move the current position to `oid`: the checked-out branch when HEAD
    /// is symbolic, HEAD itself when detached.
    pub fn advance_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        match self.read_head_raw()? {
            Head::Symbolic(ref_path) => self.update_ref(&ref_path, oid),
            Head::Detached(_) => self.set_head_detached(oid),
        }
    }

    /// Name of the checked-out branch, or `None` when HEAD is detached.
    pub fn current_branch(&self) -> anyhow::Result<Option<String>> {
        match self.read_head_raw()? {
            Head::Symbolic(ref_path) => Ok(ref_path
                .strip_prefix(&format!("{HEADS_PREFIX}/"))
                .map(str::to_string)),
            Head::Detached(_) => Ok(None),
        }
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.ref_file(&Self::branch_ref_path(name)).exists()
    }

    /// Create a branch ref. `source` may be `None` when branching from an
    /// unborn HEAD; the ref file is then created empty.
    pub fn create_branch(&self, name: &str, source: Option<&ObjectId>) -> anyhow::Result<()> {
        let content = match source {
            Some(oid) => format!("{oid}\n"),
            None => String::new(),
        };
        write_atomic(
            &self.ref_file(&Self::branch_ref_path(name)),
            content.as_bytes(),
        )
    }

    /// All branch names under refs/heads, sorted.
    pub fn list_branches(&self) -> anyhow::Result<Vec<String>> {
        let heads = self.path.join(HEADS_PREFIX);
        if !heads.exists() {
            return Ok(Vec::new());
        }

        let mut branches: Vec<String> = WalkDir::new(&heads)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(&heads)
                    .ok()
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        branches.sort();
        Ok(branches)
    }
}
