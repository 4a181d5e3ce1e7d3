//! Three-way merge of a branch into the current one.
//!
//! Order of outcomes:
//! 1. target tip equals HEAD: already up to date;
//! 2. HEAD is an ancestor of the target: fast-forward, no new commit;
//! 3. conflict-free three-way: merge commit built from the resolved
//!    path map, parents `[current, target]`;
//! 4. conflicts: merge state is persisted first, then the conflicted
//!    working files get their marker blocks, and the merge commit is
//!    deferred until the user resolves and commits.

use crate::areas::repository::Repository;
use crate::artifacts::checkout::Restorer;
use crate::artifacts::merge::ancestry;
use crate::artifacts::merge::conflict::{Conflict, PathOutcome, classify};
use crate::artifacts::merge::merge_state::MergeState;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::validate::Validator;
use crate::errors::DitError;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

/// How to resolve one conflicted path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Keep the current side's content.
    Ours,
    /// Take the merged-in side's content.
    Theirs,
    /// Drop the file.
    Delete,
    /// Leave the markers in place for hand editing.
    Manual,
}

impl Repository {
    pub fn merge(&self, branch: &str) -> anyhow::Result<()> {
        let (head, target) = Validator::new(self).validate_merge(branch)?;

        if head == target {
            writeln!(self.writer(), "Already up to date")?;
            return Ok(());
        }

        writeln!(
            self.writer(),
            "Merging {} into {}",
            target.short(),
            head.short()
        )?;

        if ancestry::is_ancestor(self.database(), &head, &target)? {
            return self.fast_forward(branch, &target);
        }

        let ancestor = ancestry::common_ancestor(self.database(), &head, &target)?;

        let base_map = self.database().commit_tree_map(ancestor.as_ref())?;
        let ours_map = self.database().commit_tree_map(Some(&head))?;
        let theirs_map = self.database().commit_tree_map(Some(&target))?;

        let mut all_paths: BTreeSet<&String> = BTreeSet::new();
        all_paths.extend(base_map.keys());
        all_paths.extend(ours_map.keys());
        all_paths.extend(theirs_map.keys());

        let mut resolved: BTreeMap<String, ObjectId> = BTreeMap::new();
        let mut conflicts: Vec<Conflict> = Vec::new();

        for path in all_paths {
            let outcome = classify(base_map.get(path), ours_map.get(path), theirs_map.get(path));
            match outcome {
                PathOutcome::KeepOurs => {
                    if let Some(oid) = ours_map.get(path) {
                        resolved.insert(path.clone(), oid.clone());
                    }
                }
                PathOutcome::TakeTheirs => {
                    if let Some(oid) = theirs_map.get(path) {
                        resolved.insert(path.clone(), oid.clone());
                    }
                }
                PathOutcome::Delete => {}
                PathOutcome::Conflict(kind) => {
                    conflicts.push(Conflict::new(
                        path.clone(),
                        self.blob_text(ours_map.get(path))?,
                        self.blob_text(theirs_map.get(path))?,
                        kind,
                    ));
                }
            }
        }

        if !conflicts.is_empty() {
            return self.start_conflicted_merge(branch, &target, &conflicts);
        }

        let commit_oid = self.write_commit_object(
            &resolved,
            vec![head, target],
            &format!("Merge branch '{branch}'"),
        )?;
        Restorer::new(self).restore_commit(&commit_oid)?;
        writeln!(self.writer(), "Merge made: {commit_oid}")?;

        Ok(())
    }

    /// `merge --abort`: drop the merge state. Working-tree contents are
    /// left as they are, the user may have edited them.
    pub fn abort_merge(&self) -> anyhow::Result<()> {
        Validator::new(self).require_repository()?;

        if !MergeState::in_progress(&self.dit_dir()) {
            anyhow::bail!(DitError::NoMergeInProgress);
        }
        MergeState::clear(&self.dit_dir())?;
        writeln!(self.writer(), "Merge aborted")?;
        Ok(())
    }

    /// Rewrite (or delete) a conflicted working file according to the
    /// chosen side. `Manual` leaves the markers for hand editing.
    pub fn resolve_conflict(&self, path: &str, resolution: Resolution) -> anyhow::Result<()> {
        Validator::new(self).require_repository()?;

        let state = MergeState::load(&self.dit_dir())?.ok_or(DitError::NoMergeInProgress)?;

        if !self.workspace().is_file(path) || !self.workspace().has_conflict_markers(path)? {
            anyhow::bail!(DitError::PathNotFound(path.to_string()));
        }

        match resolution {
            Resolution::Ours => {
                let head = self
                    .refs()
                    .read_head()?
                    .ok_or_else(|| DitError::MissingRef("HEAD".to_string()))?;
                self.take_side(&head, path)?;
            }
            Resolution::Theirs => {
                self.take_side(&state.merge_head, path)?;
            }
            Resolution::Delete => self.workspace().delete_file(path)?,
            Resolution::Manual => {}
        }

        Ok(())
    }

    /// Bring the working file in line with one side of the conflict. A
    /// side that deleted the path (a deleted-versus-modified conflict)
    /// resolves by deleting the working file.
    fn take_side(&self, commit_oid: &ObjectId, path: &str) -> anyhow::Result<()> {
        let tree = self.database().commit_tree_map(Some(commit_oid))?;
        if tree.contains_key(path) {
            Restorer::new(self).restore_file(commit_oid, path)
        } else {
            self.workspace().delete_file(path)
        }
    }

    fn fast_forward(&self, branch: &str, target: &ObjectId) -> anyhow::Result<()> {
        self.refs().advance_head(target)?;
        Restorer::new(self).restore_commit(target)?;
        writeln!(self.writer(), "Fast-forward merge to {branch}")?;
        Ok(())
    }

    /// Persist the merge state, then write the marker blocks. The state
    /// files land first so an interrupted merge is always detectable.
    fn start_conflicted_merge(
        &self,
        branch: &str,
        target: &ObjectId,
        conflicts: &[Conflict],
    ) -> anyhow::Result<()> {
        let state = MergeState::new(target.clone(), format!("Merge branch '{branch}'"));
        state.save(&self.dit_dir())?;

        for conflict in conflicts {
            self.workspace()
                .write_file(&conflict.path, conflict.markers().as_bytes())?;
        }

        writeln!(
            self.writer(),
            "Automatic merge failed; fix conflicts and then commit the result."
        )?;
        Ok(())
    }

    /// Blob content as text; absent blobs render as empty, so a
    /// deleted-versus-modified conflict shows one empty side.
    fn blob_text(&self, oid: Option<&ObjectId>) -> anyhow::Result<String> {
        match oid {
            Some(oid) => {
                let content = self.database().blob_content(oid)?;
                Ok(String::from_utf8_lossy(&content)
                    .trim_end_matches('\n')
                    .to_string())
            }
            None => Ok(String::new()),
        }
    }
}
