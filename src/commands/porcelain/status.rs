//! Working-tree status report.

use crate::areas::repository::Repository;
use crate::artifacts::status::inspector::Inspector;
use crate::artifacts::validate::Validator;
use colored::Colorize;
use std::collections::BTreeSet;
use std::io::Write;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        Validator::new(self).require_repository()?;

        let state = Inspector::new(self).collect()?;
        let head = self.refs().read_head()?;
        let head_map = self.database().commit_tree_map(head.as_ref())?;

        match self.refs().current_branch()? {
            Some(branch) => {
                writeln!(self.writer(), "{}", format!("On branch {branch}").bold())?
            }
            None => {
                let at = head
                    .as_ref()
                    .map(|oid| oid.short().to_string())
                    .unwrap_or_default();
                writeln!(self.writer(), "{}", format!("HEAD detached at {at}").bold())?
            }
        }
        writeln!(self.writer())?;

        // Split staged paths by how they relate to HEAD, and deletions by
        // whether the deletion is staged.
        let mut staged_new = BTreeSet::new();
        let mut staged_modified = BTreeSet::new();
        let mut staged_deleted = BTreeSet::new();
        let mut unstaged_deleted = BTreeSet::new();

        for path in &state.staged {
            if head_map.contains_key(path) {
                staged_modified.insert(path.clone());
            } else {
                staged_new.insert(path.clone());
            }
        }
        {
            let mut index = self.index();
            index.rehydrate()?;
        }
        for path in &state.deleted {
            let is_staged = self.index().contains(path);
            if is_staged {
                staged_deleted.insert(path.clone());
            } else {
                unstaged_deleted.insert(path.clone());
            }
        }

        // Conflicted paths get their own section; keep them out of the
        // plain modified listing.
        let unstaged_modified: BTreeSet<String> = state
            .modified
            .difference(&state.staged)
            .filter(|path| !state.conflicted.contains(*path))
            .cloned()
            .collect();

        if !state.conflicted.is_empty() {
            writeln!(self.writer(), "{}", "Unmerged paths:".red().bold())?;
            writeln!(
                self.writer(),
                "{}",
                "  (fix conflicts and run \"dit commit\")".red()
            )?;
            writeln!(self.writer())?;
            for path in &state.conflicted {
                writeln!(self.writer(), "\t{}{path}", "both modified:   ".red().bold())?;
            }
            writeln!(self.writer())?;
        }

        if !staged_new.is_empty() || !staged_modified.is_empty() || !staged_deleted.is_empty() {
            writeln!(self.writer(), "{}", "Changes to be committed:".green().bold())?;
            writeln!(self.writer())?;
            for path in &staged_new {
                writeln!(self.writer(), "\t{}{path}", "new file:   ".green().bold())?;
            }
            for path in &staged_modified {
                writeln!(self.writer(), "\t{}{path}", "modified:   ".green().bold())?;
            }
            for path in &staged_deleted {
                writeln!(self.writer(), "\t{}{path}", "deleted:    ".green().bold())?;
            }
            writeln!(self.writer())?;
        }

        if !unstaged_modified.is_empty() || !unstaged_deleted.is_empty() {
            writeln!(
                self.writer(),
                "{}",
                "Changes not staged for commit:".red().bold()
            )?;
            writeln!(
                self.writer(),
                "{}",
                "  (use \"dit add <file>...\" to update what will be committed)".red()
            )?;
            writeln!(self.writer())?;
            for path in &unstaged_modified {
                writeln!(self.writer(), "\t{}{path}", "modified:   ".red().bold())?;
            }
            for path in &unstaged_deleted {
                writeln!(self.writer(), "\t{}{path}", "deleted:    ".red().bold())?;
            }
            writeln!(self.writer())?;
        }

        if !state.untracked.is_empty() {
            writeln!(self.writer(), "{}", "Untracked files:".red().bold())?;
            writeln!(
                self.writer(),
                "{}",
                "  (use \"dit add <file>...\" to include in what will be committed)".red()
            )?;
            writeln!(self.writer())?;
            for path in &state.untracked {
                writeln!(self.writer(), "\t{path}")?;
            }
            writeln!(self.writer())?;
        }

        if state.is_clean() {
            writeln!(
                self.writer(),
                "{}",
                "nothing to commit, working tree clean".green().bold()
            )?;
        }

        Ok(())
    }
}
