//! Branch creation and listing.

use crate::areas::repository::Repository;
use crate::artifacts::validate::Validator;
use std::io::Write;

impl Repository {
    /// `branch <name>` creates a branch at the current commit;
    /// `branch` lists existing branches.
    pub fn branch(&self, name: Option<&str>) -> anyhow::Result<()> {
        match name {
            Some(name) => self.create_branch(name),
            None => self.list_branches(),
        }
    }

    fn create_branch(&self, name: &str) -> anyhow::Result<()> {
        let branch_name = Validator::new(self).validate_branch_creation(name)?;

        let head = self.refs().read_head()?;
        self.refs().create_branch(branch_name.as_ref(), head.as_ref())?;

        match head {
            Some(oid) => writeln!(self.writer(), "Created branch {branch_name} at {oid}")?,
            None => writeln!(self.writer(), "Created branch {branch_name} (no commits)")?,
        }
        Ok(())
    }

    fn list_branches(&self) -> anyhow::Result<()> {
        Validator::new(self).require_repository()?;

        let mut branches = self.refs().list_branches()?;
        let current = self.refs().current_branch()?;
        if let Some(current) = &current {
            // The checked-out branch may be unborn and have no ref file yet.
            if !branches.contains(current) {
                branches.push(current.clone());
                branches.sort();
            }
        }

        if branches.is_empty() {
            writeln!(self.writer(), "No branches found")?;
            return Ok(());
        }

        for branch in &branches {
            if Some(branch) == current.as_ref() {
                writeln!(self.writer(), "* {branch}")?;
            } else {
                writeln!(self.writer(), "  {branch}")?;
            }
        }
        Ok(())
    }
}
