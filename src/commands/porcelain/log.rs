//! Commit history listing.
//!
//! Enumerates every commit object in the store by scanning the object
//! directories, newest first (hash order breaks timestamp ties), so
//! commits unreachable from any ref still show up.

use crate::areas::repository::Repository;
use crate::artifacts::validate::Validator;
use colored::Colorize;
use std::io::Write;

impl Repository {
    pub fn log(&self) -> anyhow::Result<()> {
        Validator::new(self).require_repository()?;

        let mut commits = self.database().all_commits()?;
        if commits.is_empty() {
            writeln!(self.writer(), "No commits")?;
            return Ok(());
        }

        commits.sort_by(|(hash_a, commit_a), (hash_b, commit_b)| {
            commit_b
                .timestamp()
                .cmp(&commit_a.timestamp())
                .then_with(|| hash_a.cmp(hash_b))
        });

        let head = self.refs().read_head()?;
        let current_branch = self.refs().current_branch()?;

        for (oid, commit) in &commits {
            let decoration = if Some(oid) == head.as_ref() {
                match &current_branch {
                    Some(branch) => format!(" (HEAD -> {branch})"),
                    None => " (HEAD)".to_string(),
                }
            } else {
                String::new()
            };

            writeln!(
                self.writer(),
                "{}{}",
                format!("commit {oid}").yellow(),
                decoration.yellow().bold()
            )?;
            writeln!(self.writer(), "Author: {}", commit.author())?;
            writeln!(self.writer(), "Date:   {}", format_timestamp(commit.timestamp()))?;
            writeln!(self.writer())?;
            for line in commit.message().lines() {
                writeln!(self.writer(), "    {line}")?;
            }
            writeln!(self.writer())?;
        }

        Ok(())
    }
}

fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|datetime| datetime.format("%a %b %-d %H:%M:%S %Y %z").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
