//! Declarative preconditions, checked before any mutation.
//!
//! Every porcelain command funnels through here first, so a failed
//! precondition never leaves partial state behind.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::merge::merge_state::MergeState;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::inspector::Inspector;
use crate::errors::DitError;
use derive_new::new;

#[derive(new)]
pub struct Validator<'r> {
    repository: &'r Repository,
}

impl Validator<'_> {
    /// The repository must be initialized.
    pub fn require_repository(&self) -> anyhow::Result<()> {
        if !self.repository.is_initialized() {
            anyhow::bail!(DitError::NotARepo);
        }
        Ok(())
    }

    /// Checkout: the target must resolve and the working tree must be clean
    /// (untracked files do not block). Returns the resolved target.
    pub fn validate_checkout(&self, target: &str) -> anyhow::Result<Revision> {
        self.require_repository()?;
        let revision = Revision::resolve(self.repository, target)?;
        self.require_clean_tree("checkout")?;
        Ok(revision)
    }

    /// Merge: no merge already in progress, the branch must exist with at
    /// least one commit, it must not be the checked-out branch, and the
    /// working tree must be clean. Returns (current head, target tip).
    pub fn validate_merge(&self, branch: &str) -> anyhow::Result<(ObjectId, ObjectId)> {
        self.require_repository()?;

        if MergeState::in_progress(&self.repository.dit_dir()) {
            anyhow::bail!(DitError::MergeInProgress);
        }

        let refs = self.repository.refs();
        if !refs.branch_exists(branch) {
            anyhow::bail!(DitError::MissingRef(branch.to_string()));
        }
        let target = refs
            .read_ref(&crate::areas::refs::Refs::branch_ref_path(branch))?
            .ok_or_else(|| DitError::MissingRef(branch.to_string()))?;

        if refs.current_branch()?.as_deref() == Some(branch) {
            anyhow::bail!("cannot merge branch '{branch}' into itself");
        }

        let head = refs
            .read_head()?
            .ok_or_else(|| DitError::MissingRef("HEAD".to_string()))?;

        self.require_clean_tree("merge")?;
        Ok((head, target))
    }

    /// Commit: staged changes must exist, unless a merge is being
    /// concluded.
    pub fn validate_commit(&self, index: &Index, merging: bool) -> anyhow::Result<()> {
        self.require_repository()?;
        if index.is_empty() && !merging {
            anyhow::bail!(DitError::NothingToCommit);
        }
        Ok(())
    }

    /// Branch creation: the name must be well formed and unused.
    pub fn validate_branch_creation(&self, name: &str) -> anyhow::Result<BranchName> {
        self.require_repository()?;
        let branch_name = BranchName::try_parse(name)?;
        if self.repository.refs().branch_exists(name) {
            anyhow::bail!(DitError::AlreadyExists(format!("branch '{name}'")));
        }
        Ok(branch_name)
    }

    /// Add: the path must exist on disk, be tracked in HEAD (staging a
    /// deletion), or already be staged.
    pub fn validate_file_add(&self, path: &str) -> anyhow::Result<()> {
        self.require_repository()?;

        if path.starts_with('/') || path.split('/').any(|segment| segment == "..") {
            anyhow::bail!(DitError::PathNotFound(path.to_string()));
        }

        if self.repository.workspace().exists(path) {
            return Ok(());
        }

        let mut index = Index::new(
            self.repository
                .index()
                .path()
                .to_path_buf()
                .into_boxed_path(),
        );
        index.rehydrate()?;
        if index.contains(path) {
            return Ok(());
        }

        let head = self.repository.refs().read_head()?;
        let head_map = self.repository.database().commit_tree_map(head.as_ref())?;
        if head_map.contains_key(path) {
            return Ok(());
        }

        anyhow::bail!(DitError::PathNotFound(path.to_string()))
    }

    /// Staged or modified tracked files block working-tree moves.
    fn require_clean_tree(&self, operation: &str) -> anyhow::Result<()> {
        let state = Inspector::new(self.repository).collect()?;
        if !state.is_clean_for_switch() {
            anyhow::bail!(DitError::WouldOverwriteChanges(operation.to_string()));
        }
        Ok(())
    }
}
