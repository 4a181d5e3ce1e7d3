//! In-progress merge state.
//!
//! A merge that stopped on conflicts is encoded by the presence of
//! `MERGE_HEAD` (the target commit) and `MERGE_MSG` (the prepared commit
//! message) in the metadata directory. Their joint absence means no merge
//! is in progress.

use crate::areas::write_atomic;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::path::Path;

pub const MERGE_HEAD_FILE: &str = "MERGE_HEAD";
pub const MERGE_MSG_FILE: &str = "MERGE_MSG";

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MergeState {
    /// The commit being merged in; second parent of the eventual commit.
    pub merge_head: ObjectId,
    /// Prepared commit message template.
    pub message: String,
}

impl MergeState {
    pub fn in_progress(dit_dir: &Path) -> bool {
        dit_dir.join(MERGE_HEAD_FILE).exists()
    }

    pub fn load(dit_dir: &Path) -> anyhow::Result<Option<MergeState>> {
        let head_path = dit_dir.join(MERGE_HEAD_FILE);
        if !head_path.exists() {
            return Ok(None);
        }

        let merge_head = std::fs::read_to_string(&head_path)
            .context("unable to read MERGE_HEAD")?
            .trim()
            .to_string();
        let merge_head = ObjectId::try_parse(merge_head)?;

        let msg_path = dit_dir.join(MERGE_MSG_FILE);
        let message = if msg_path.exists() {
            std::fs::read_to_string(&msg_path)
                .context("unable to read MERGE_MSG")?
                .trim_end()
                .to_string()
        } else {
            String::new()
        };

        Ok(Some(MergeState::new(merge_head, message)))
    }

    /// Persist the state. Written before any conflict file touches the
    /// working tree so an interrupted merge is always detectable.
    pub fn save(&self, dit_dir: &Path) -> anyhow::Result<()> {
        write_atomic(
            &dit_dir.join(MERGE_HEAD_FILE),
            format!("{}\n", self.merge_head).as_bytes(),
        )?;
        write_atomic(
            &dit_dir.join(MERGE_MSG_FILE),
            format!("{}\n", self.message).as_bytes(),
        )
    }

    /// Remove the state files on completion or abort.
    pub fn clear(dit_dir: &Path) -> anyhow::Result<()> {
        for file in [MERGE_HEAD_FILE, MERGE_MSG_FILE] {
            let path = dit_dir.join(file);
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("unable to remove {file}"))?;
            }
        }
        Ok(())
    }
}
