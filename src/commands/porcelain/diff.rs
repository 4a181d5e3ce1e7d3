//! Working file vs HEAD diff.

use crate::areas::repository::Repository;
use crate::artifacts::diff;
use crate::artifacts::validate::Validator;
use crate::errors::DitError;
use std::io::Write;

impl Repository {
    pub fn diff(&self, path: &str, side_by_side: bool) -> anyhow::Result<()> {
        Validator::new(self).require_repository()?;

        if !self.workspace().is_file(path) {
            anyhow::bail!(DitError::PathNotFound(path.to_string()));
        }

        let working = read_lines(&self.workspace().read_file(path)?);
        let head_lines = self.head_lines(path)?;

        let mut writer = self.writer();
        if side_by_side {
            diff::render_side_by_side(writer.as_mut(), path, &head_lines, &working)?;
            return Ok(());
        }

        let lines = diff::compute(&head_lines, &working);
        if !diff::has_changes(&lines) {
            writeln!(writer, "no changes in {path}")?;
            return Ok(());
        }
        diff::render_unified(writer.as_mut(), path, &lines)
    }

    /// Lines of the path's HEAD version; empty when untracked or unborn.
    fn head_lines(&self, path: &str) -> anyhow::Result<Vec<String>> {
        let head = self.refs().read_head()?;
        let head_map = self.database().commit_tree_map(head.as_ref())?;
        match head_map.get(path) {
            Some(oid) => Ok(read_lines(&self.database().blob_content(oid)?)),
            None => Ok(Vec::new()),
        }
    }
}

fn read_lines(content: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(content)
        .lines()
        .map(str::to_string)
        .collect()
}
