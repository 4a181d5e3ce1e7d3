//! Snapshotting: turn the index into a tree DAG and record a commit.

use crate::areas::repository::Repository;
use crate::artifacts::hooks::{COMMIT_MSG, POST_COMMIT, PRE_COMMIT};
use crate::artifacts::merge::merge_state::MergeState;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::status::inspector::Inspector;
use crate::artifacts::validate::Validator;
use crate::errors::DitError;
use std::collections::BTreeMap;
use std::io::Write;

impl Repository {
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        {
            let mut index = self.index();
            index.rehydrate()?;
        }

        let merge_state = MergeState::load(&self.dit_dir())?;
        {
            let index = self.index();
            Validator::new(self).validate_commit(&index, merge_state.is_some())?;
        }

        // Concluding a merge requires every conflict to be resolved.
        if merge_state.is_some() {
            let state = Inspector::new(self).collect()?;
            if !state.conflicted.is_empty() {
                anyhow::bail!(DitError::ConflictsRemain);
            }
        }

        if !self.hooks().run(PRE_COMMIT, &[])? {
            anyhow::bail!("pre-commit hook rejected the commit");
        }
        if !self.hooks().run(COMMIT_MSG, &[message])? {
            anyhow::bail!("commit-msg hook rejected the commit");
        }

        let head = self.refs().read_head()?;
        let mut parents: Vec<ObjectId> = head.iter().cloned().collect();
        if let Some(state) = &merge_state {
            parents.push(state.merge_head.clone());
        }

        let effective = self.effective_tree_map(head.as_ref())?;
        let oid = self.write_commit_object(&effective, parents, message)?;

        if merge_state.is_some() {
            MergeState::clear(&self.dit_dir())?;
        }

        self.hooks().run(POST_COMMIT, &[oid.as_ref()])?;
        writeln!(self.writer(), "Committed: {oid}")?;

        Ok(())
    }

    /// The flattened HEAD tree overlaid with the index: staged content
    /// overwrites, staged deletions remove.
    pub(crate) fn effective_tree_map(
        &self,
        head: Option<&ObjectId>,
    ) -> anyhow::Result<BTreeMap<String, ObjectId>> {
        let mut effective = self.database().commit_tree_map(head)?;
        let index = self.index();
        for entry in index.entries() {
            match &entry.oid {
                Some(oid) => {
                    effective.insert(entry.path.clone(), oid.clone());
                }
                None => {
                    effective.remove(&entry.path);
                }
            }
        }
        Ok(effective)
    }

    /// Write the tree DAG and the commit object, advance the current ref,
    /// then clear the index. Objects land before the ref that names them;
    /// the index is cleared last.
    pub(crate) fn write_commit_object(
        &self,
        tree_map: &BTreeMap<String, ObjectId>,
        parents: Vec<ObjectId>,
        message: &str,
    ) -> anyhow::Result<ObjectId> {
        let tree_oid = Tree::write_from_map(self.database(), tree_map)?;

        let commit = Commit::new(
            tree_oid,
            parents,
            self.author(),
            self.commit_timestamp(),
            message.to_string(),
        )?;
        let oid = self.database().store(&commit)?;

        self.refs().advance_head(&oid)?;

        let mut index = self.index();
        index.clear();
        index.write_updates()?;

        Ok(oid)
    }
}
