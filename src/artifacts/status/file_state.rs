//! Per-path file states and the aggregate working-tree snapshot.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Same content in HEAD, index (if present) and working tree.
    Unmodified,
    /// Working content differs from its tracked or staged content.
    Modified,
    /// Index content differs from HEAD.
    Staged,
    /// Present on disk, unknown to HEAD and index.
    Untracked,
    /// Gone from the working tree, or staged for deletion.
    Deleted,
    /// Working file carries conflict markers.
    Conflicted,
}

/// The classifier's output: a canonical per-path state plus aggregate sets.
///
/// A path staged and then modified again keeps `Staged` as its canonical
/// state and additionally appears in `modified`, so status can report both
/// facets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkdirState {
    states: BTreeMap<String, FileState>,
    pub untracked: BTreeSet<String>,
    pub staged: BTreeSet<String>,
    pub modified: BTreeSet<String>,
    pub deleted: BTreeSet<String>,
    pub conflicted: BTreeSet<String>,
}

impl WorkdirState {
    pub fn state_of(&self, path: &str) -> FileState {
        self.states
            .get(path)
            .copied()
            .unwrap_or(FileState::Untracked)
    }

    pub(crate) fn record(&mut self, path: &str, state: FileState) {
        self.states.insert(path.to_string(), state);
    }

    pub fn paths(&self) -> impl Iterator<Item = (&String, &FileState)> {
        self.states.iter()
    }

    /// Staged content or staged/unstaged deletions exist.
    pub fn has_staged_changes(&self) -> bool {
        !self.staged.is_empty() || !self.deleted.is_empty()
    }

    /// Clean enough to move the working tree: nothing staged, nothing
    /// modified, no deletions. Untracked files do not count.
    pub fn is_clean_for_switch(&self) -> bool {
        self.staged.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    pub fn has_uncommitted_changes(&self) -> bool {
        !self.is_clean_for_switch() || !self.untracked.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_uncommitted_changes() && self.conflicted.is_empty()
    }
}
