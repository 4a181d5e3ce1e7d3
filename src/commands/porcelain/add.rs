//! Staging: `add <path>` and `add .`.

use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::validate::Validator;
use std::io::Write;

impl Repository {
    pub fn add(&self, paths: &[String]) -> anyhow::Result<()> {
        Validator::new(self).require_repository()?;

        {
            let mut index = self.index();
            index.rehydrate()?;
        }

        for path in paths {
            if path == "." {
                self.add_all()?;
            } else {
                self.add_path(&normalize(path))?;
            }
        }

        let mut index = self.index();
        index.write_updates()
    }

    /// Stage one path: blob the file when it exists, otherwise stage a
    /// deletion for a HEAD-tracked or already-staged path.
    fn add_path(&self, path: &str) -> anyhow::Result<()> {
        Validator::new(self).validate_file_add(path)?;

        if self.workspace().is_file(path) {
            let blob = Blob::new(self.workspace().read_file(path)?);
            let oid = self.database().store(&blob)?;
            self.index().stage(path.to_string(), Some(oid.clone()));
            writeln!(self.writer(), "Added {path} as blob {oid}")?;
        } else if self.workspace().exists(path) {
            // Directories hold nothing themselves; only their files are
            // tracked.
            writeln!(self.writer(), "Cannot add directory: {path}. Use 'add .'")?;
        } else {
            self.index().stage(path.to_string(), None);
            writeln!(self.writer(), "Staged deletion of {path}")?;
        }

        Ok(())
    }

    /// Stage every new or modified file plus deletions for tracked files
    /// gone from the working tree.
    fn add_all(&self) -> anyhow::Result<()> {
        let head = self.refs().read_head()?;
        let head_map = self.database().commit_tree_map(head.as_ref())?;
        let working = self.workspace().list_files(&self.ignore_rules())?;

        let mut added = 0usize;
        let mut deletions = 0usize;

        for path in &working {
            let working_oid = self.workspace().hash_file(path)?;

            let already_staged = self.index().entry(path).map(|entry| entry.oid.clone());
            if already_staged == Some(Some(working_oid.clone())) {
                continue;
            }
            if !self.index().contains(path) && head_map.get(path) == Some(&working_oid) {
                // Unchanged since HEAD and not restaged; nothing to do.
                continue;
            }

            let blob = Blob::new(self.workspace().read_file(path)?);
            let oid = self.database().store(&blob)?;
            self.index().stage(path.clone(), Some(oid));
            added += 1;
        }

        for path in head_map.keys() {
            if self.workspace().exists(path) {
                continue;
            }
            let staged_as_deletion = self.index().entry(path).map(|e| e.oid.is_none());
            if staged_as_deletion != Some(true) {
                self.index().stage(path.clone(), None);
                deletions += 1;
            }
        }

        writeln!(
            self.writer(),
            "Added {added} files and staged {deletions} deletions"
        )?;

        Ok(())
    }
}

fn normalize(path: &str) -> String {
    path.trim_start_matches("./").replace('\\', "/")
}
