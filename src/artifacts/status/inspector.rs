//! State classifier: joins HEAD tree, index and working tree into a
//! per-path `FileState`.
//!
//! The classifier is read-only and deterministic: identical inputs produce
//! identical `WorkdirState` values. Content comparison recomputes the blob
//! hash of the working file with the same canonical blob encoding the store
//! uses, so hash equality is content equality.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_state::{FileState, WorkdirState};
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl Inspector<'_> {
    /// Classify every relevant path.
    pub fn collect(&self) -> anyhow::Result<WorkdirState> {
        let repo = self.repository;

        let head_oid = repo.refs().read_head()?;
        let head_map = repo.database().commit_tree_map(head_oid.as_ref())?;

        let mut index = Index::new(repo.index().path().to_path_buf().into_boxed_path());
        index.rehydrate()?;

        let working: BTreeSet<String> = repo
            .workspace()
            .list_files(&repo.ignore_rules())?
            .into_iter()
            .collect();

        let mut state = WorkdirState::default();

        self.classify_index_entries(&index, &head_map, &working, &mut state)?;
        self.classify_unstaged_paths(&index, &head_map, &working, &mut state)?;
        self.classify_missing_tracked_paths(&index, &head_map, &working, &mut state);
        self.classify_conflicts(&working, &mut state)?;

        Ok(state)
    }

    fn classify_index_entries(
        &self,
        index: &Index,
        head_map: &BTreeMap<String, ObjectId>,
        working: &BTreeSet<String>,
        state: &mut WorkdirState,
    ) -> anyhow::Result<()> {
        for entry in index.entries() {
            let path = entry.path.as_str();

            let Some(staged_oid) = entry.oid.as_ref() else {
                // Staged deletion, whether or not the file still exists.
                state.record(path, FileState::Deleted);
                state.deleted.insert(path.to_string());
                continue;
            };

            if working.contains(path) {
                let working_oid = self.repository.workspace().hash_file(path)?;
                if *staged_oid == working_oid {
                    if head_map.get(path) == Some(staged_oid) {
                        // Freshly re-added with content equal to HEAD.
                        state.record(path, FileState::Unmodified);
                    } else {
                        state.record(path, FileState::Staged);
                        state.staged.insert(path.to_string());
                    }
                } else {
                    // Staged, then modified again: canonical state stays
                    // Staged, the modified set carries the second facet.
                    state.record(path, FileState::Staged);
                    state.staged.insert(path.to_string());
                    state.modified.insert(path.to_string());
                }
            } else {
                state.record(path, FileState::Deleted);
                state.deleted.insert(path.to_string());
            }
        }
        Ok(())
    }

    fn classify_unstaged_paths(
        &self,
        index: &Index,
        head_map: &BTreeMap<String, ObjectId>,
        working: &BTreeSet<String>,
        state: &mut WorkdirState,
    ) -> anyhow::Result<()> {
        for path in working {
            if index.contains(path) {
                continue;
            }
            match head_map.get(path) {
                Some(head_oid) => {
                    let working_oid = self.repository.workspace().hash_file(path)?;
                    if *head_oid == working_oid {
                        state.record(path, FileState::Unmodified);
                    } else {
                        state.record(path, FileState::Modified);
                        state.modified.insert(path.to_string());
                    }
                }
                None => {
                    state.record(path, FileState::Untracked);
                    state.untracked.insert(path.to_string());
                }
            }
        }
        Ok(())
    }

    /// HEAD-tracked paths gone from disk without a corresponding index
    /// entry: unstaged deletions.
    fn classify_missing_tracked_paths(
        &self,
        index: &Index,
        head_map: &BTreeMap<String, ObjectId>,
        working: &BTreeSet<String>,
        state: &mut WorkdirState,
    ) {
        for path in head_map.keys() {
            if working.contains(path) || index.contains(path) {
                continue;
            }
            state.record(path, FileState::Deleted);
            state.deleted.insert(path.to_string());
        }
    }

    /// Conflict markers override every other classification.
    fn classify_conflicts(
        &self,
        working: &BTreeSet<String>,
        state: &mut WorkdirState,
    ) -> anyhow::Result<()> {
        for path in working {
            if self.repository.workspace().has_conflict_markers(path)? {
                state.record(path, FileState::Conflicted);
                state.conflicted.insert(path.to_string());
            }
        }
        Ok(())
    }
}
