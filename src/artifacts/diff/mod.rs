//! Line diff between two file versions, with unified and side-by-side
//! rendering. The diff is LCS-based: a dynamic-programming table over the
//! two line lists, backtracked into added/removed/unchanged runs.

use colored::Colorize;
use std::io::Write;

const CONTEXT_LINES: usize = 3;
const SIDE_WIDTH: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    Unchanged,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub content: String,
    /// 1-based line number in the old version; 0 for added lines.
    pub old_no: usize,
    /// 1-based line number in the new version; 0 for removed lines.
    pub new_no: usize,
}

/// Compute the line diff from `old` to `new`.
pub fn compute(old: &[String], new: &[String]) -> Vec<DiffLine> {
    let mut lcs = vec![vec![0usize; new.len() + 1]; old.len() + 1];
    for i in 1..=old.len() {
        for j in 1..=new.len() {
            lcs[i][j] = if old[i - 1] == new[j - 1] {
                lcs[i - 1][j - 1] + 1
            } else {
                lcs[i - 1][j].max(lcs[i][j - 1])
            };
        }
    }

    let mut lines = Vec::new();
    let (mut i, mut j) = (old.len(), new.len());
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1] == new[j - 1] {
            lines.push(DiffLine {
                kind: DiffLineKind::Unchanged,
                content: old[i - 1].clone(),
                old_no: i,
                new_no: j,
            });
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || lcs[i][j - 1] >= lcs[i - 1][j]) {
            lines.push(DiffLine {
                kind: DiffLineKind::Added,
                content: new[j - 1].clone(),
                old_no: 0,
                new_no: j,
            });
            j -= 1;
        } else {
            lines.push(DiffLine {
                kind: DiffLineKind::Removed,
                content: old[i - 1].clone(),
                old_no: i,
                new_no: 0,
            });
            i -= 1;
        }
    }
    lines.reverse();
    lines
}

pub fn has_changes(lines: &[DiffLine]) -> bool {
    lines
        .iter()
        .any(|line| line.kind != DiffLineKind::Unchanged)
}

/// Unified rendering: header, then change runs with a few context lines.
pub fn render_unified(
    writer: &mut dyn Write,
    path: &str,
    lines: &[DiffLine],
) -> anyhow::Result<()> {
    writeln!(writer, "{}", format!("diff --dit a/{path} b/{path}").cyan().bold())?;
    writeln!(writer, "{}", format!("--- a/{path}").cyan().bold())?;
    writeln!(writer, "{}", format!("+++ b/{path}").cyan().bold())?;

    for (position, line) in lines.iter().enumerate() {
        match line.kind {
            DiffLineKind::Unchanged => {
                if near_change(lines, position) {
                    writeln!(writer, "  {:>3}: {}", line.old_no, line.content)?;
                }
            }
            DiffLineKind::Added => {
                let prefix = format!("+{:>3}: ", line.new_no);
                writeln!(writer, "{}{}", prefix.green().bold(), line.content.green())?;
            }
            DiffLineKind::Removed => {
                let prefix = format!("-{:>3}: ", line.old_no);
                writeln!(writer, "{}{}", prefix.red().bold(), line.content.red())?;
            }
        }
    }

    Ok(())
}

fn near_change(lines: &[DiffLine], position: usize) -> bool {
    let from = position.saturating_sub(CONTEXT_LINES);
    let to = (position + CONTEXT_LINES + 1).min(lines.len());
    lines[from..to]
        .iter()
        .any(|line| line.kind != DiffLineKind::Unchanged)
}

/// Two-column rendering: old version on the left, new on the right.
pub fn render_side_by_side(
    writer: &mut dyn Write,
    path: &str,
    old: &[String],
    new: &[String],
) -> anyhow::Result<()> {
    writeln!(
        writer,
        "{}",
        format!("=== Side-by-Side Diff: {path} ===").cyan().bold()
    )?;
    writeln!(
        writer,
        "{} | {}",
        "OLD (HEAD)".red().bold(),
        "NEW (Working)".green().bold()
    )?;

    let rows = old.len().max(new.len());
    for row in 0..rows {
        let old_line = old.get(row).map(String::as_str).unwrap_or("");
        let new_line = new.get(row).map(String::as_str).unwrap_or("");
        let left = clip(old_line);

        if old_line == new_line {
            writeln!(writer, "{left:<SIDE_WIDTH$} | {new_line}")?;
        } else {
            writeln!(
                writer,
                "{:<SIDE_WIDTH$} | {}",
                left.red(),
                new_line.green()
            )?;
        }
    }

    Ok(())
}

fn clip(line: &str) -> String {
    // Count characters, not bytes: a byte-index slice could split a
    // multi-byte UTF-8 character and panic.
    if line.chars().count() > SIDE_WIDTH {
        let clipped: String = line.chars().take(SIDE_WIDTH - 3).collect();
        format!("{clipped}...")
    } else {
        line.to_string()
    }
}
