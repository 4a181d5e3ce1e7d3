//! Working-tree restore engine.
//!
//! Restoring a commit brings the working tree to the commit's tree: files
//! absent from the target are deleted, everything in the target is written
//! out (existing files overwritten, parents created). Deletion skips
//! "important" paths (anything the ignore rules cover and anything under a
//! protected prefix) so user files that were never tracked survive a
//! switch.

use crate::areas::repository::Repository;
use crate::artifacts::config::Config;
use crate::artifacts::ignore::IgnoreRules;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::BTreeMap;

/// Prefixes never deleted by checkout unless overridden via the
/// `checkout.protect` config key (comma-separated list).
const DEFAULT_PROTECTED_PREFIXES: &[&str] = &["target/", ".idea/", ".mvn/"];

/// Prefixes shielded from checkout deletion.
pub fn protected_prefixes(config: &Config) -> Vec<String> {
    match config.get("checkout.protect") {
        Ok(Some(value)) => value
            .split(',')
            .map(|prefix| prefix.trim().to_string())
            .filter(|prefix| !prefix.is_empty())
            .collect(),
        _ => DEFAULT_PROTECTED_PREFIXES
            .iter()
            .map(|prefix| prefix.to_string())
            .collect(),
    }
}

fn is_important(path: &str, rules: &IgnoreRules, protected: &[String]) -> bool {
    rules.is_ignored(path)
        || protected.iter().any(|prefix| {
            path.starts_with(prefix.as_str()) || path == prefix.trim_end_matches('/')
        })
}

#[derive(new)]
pub struct Restorer<'r> {
    repository: &'r Repository,
}

impl Restorer<'_> {
    /// Make the working tree match the tree of `commit_oid`.
    pub fn restore_commit(&self, commit_oid: &ObjectId) -> anyhow::Result<()> {
        let repo = self.repository;
        let target: BTreeMap<String, ObjectId> =
            repo.database().commit_tree_map(Some(commit_oid))?;

        let rules = repo.ignore_rules();
        let protected = protected_prefixes(repo.config());

        // Current files are enumerated without ignore filtering so stray
        // tracked files in otherwise-ignored places still get considered;
        // the importance guard below decides what survives.
        let current = repo.workspace().list_files(&IgnoreRules::default())?;
        for path in current {
            if !target.contains_key(&path) && !is_important(&path, &rules, &protected) {
                repo.workspace().delete_file(&path)?;
            }
        }

        for (path, oid) in &target {
            let content = repo.database().blob_content(oid)?;
            repo.workspace().write_file(path, &content)?;
        }

        Ok(())
    }

    /// Restore a single tracked path from a commit without touching HEAD.
    pub fn restore_file(&self, commit_oid: &ObjectId, path: &str) -> anyhow::Result<()> {
        let repo = self.repository;
        let target = repo.database().commit_tree_map(Some(commit_oid))?;
        let oid = target
            .get(path)
            .ok_or_else(|| crate::errors::DitError::PathNotFound(path.to_string()))?;
        let content = repo.database().blob_content(oid)?;
        repo.workspace().write_file(path, &content)
    }
}
