//! HEAD switching and single-file restore.

use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::Restorer;
use crate::artifacts::validate::Validator;
use crate::errors::DitError;
use std::io::Write;

impl Repository {
    /// Switch to a branch, commit hash or `HEAD`.
    pub fn checkout(&self, target: &str) -> anyhow::Result<()> {
        if target == "HEAD" {
            return self.checkout_head();
        }

        // Resolve first so "already on" wins over the clean-tree check.
        Validator::new(self).require_repository()?;
        let revision = Revision::resolve(self, target)?;
        if self.already_on(&revision)? {
            writeln!(self.writer(), "Already on '{target}'")?;
            return Ok(());
        }

        let revision = Validator::new(self).validate_checkout(target)?;

        Restorer::new(self).restore_commit(&revision.oid)?;

        match &revision.branch {
            Some(branch) => {
                self.refs()
                    .set_head_to_ref(&crate::areas::refs::Refs::branch_ref_path(branch))?;
                writeln!(self.writer(), "Switched to branch '{branch}'")?;
            }
            None => {
                self.refs().set_head_detached(&revision.oid)?;
                writeln!(self.writer(), "HEAD is now at {}", revision.oid)?;
            }
        }

        Ok(())
    }

    /// `checkout HEAD`: re-materialize the current commit's tree without
    /// moving HEAD.
    fn checkout_head(&self) -> anyhow::Result<()> {
        let revision = Validator::new(self).validate_checkout("HEAD")?;
        Restorer::new(self).restore_commit(&revision.oid)?;
        writeln!(self.writer(), "Restored working directory to HEAD")?;
        Ok(())
    }

    /// `checkout -- <file>`: restore one tracked path from HEAD.
    pub fn checkout_file(&self, path: &str) -> anyhow::Result<()> {
        Validator::new(self).require_repository()?;

        let head = self
            .refs()
            .read_head()?
            .ok_or_else(|| DitError::MissingRef("HEAD".to_string()))?;
        Restorer::new(self).restore_file(&head, path)?;
        writeln!(self.writer(), "Updated {path}")?;
        Ok(())
    }

    /// The target is where we already are: the checked-out branch, or the
    /// current commit while detached.
    fn already_on(&self, revision: &Revision) -> anyhow::Result<bool> {
        match &revision.branch {
            Some(branch) => Ok(self.refs().current_branch()?.as_deref() == Some(branch.as_str())),
            None => {
                let detached = self.refs().current_branch()?.is_none();
                Ok(detached && self.refs().read_head()? == Some(revision.oid.clone()))
            }
        }
    }
}
