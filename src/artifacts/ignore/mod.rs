//! `.dignore` rules and built-in always-ignored prefixes.
//!
//! The file is line oriented: `#` starts a comment, `dir/` matches a
//! directory prefix, a pattern containing `*` is matched as a whole-string
//! wildcard, anything else matches the exact path or acts as a directory
//! prefix. Wildcards are the naive `*` to `.*` regex rewrite; `**` and
//! character classes are not supported.

use regex::Regex;
use std::path::Path;

pub const IGNORE_FILE: &str = ".dignore";

/// Prefixes ignored regardless of `.dignore` contents: the metadata
/// directory plus common build and editor output.
pub const ALWAYS_IGNORED: &[&str] = &[".dit", "target", ".idea", ".mvn"];

#[derive(Debug, Clone)]
enum Pattern {
    /// `dir/`: the path itself or anything under it.
    Directory(String),
    /// Contains `*`; compiled with the naive rewrite, full-string match.
    Wildcard(Regex),
    /// Bare pattern: exact path match, or directory prefix.
    Plain(String),
}

#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<Pattern>,
}

impl IgnoreRules {
    /// Load the rules from `.dignore` at the working-tree root. A missing
    /// or unreadable file leaves only the built-ins active.
    pub fn load(root: &Path) -> Self {
        match std::fs::read_to_string(root.join(IGNORE_FILE)) {
            Ok(content) => Self::parse(&content),
            Err(_) => IgnoreRules::default(),
        }
    }

    pub fn parse(content: &str) -> Self {
        let mut patterns = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(dir) = line.strip_suffix('/') {
                patterns.push(Pattern::Directory(dir.to_string()));
            } else if line.contains('*') {
                let rewritten = format!("^{}$", line.replace('*', ".*"));
                if let Ok(regex) = Regex::new(&rewritten) {
                    patterns.push(Pattern::Wildcard(regex));
                }
            } else {
                patterns.push(Pattern::Plain(line.to_string()));
            }
        }
        IgnoreRules { patterns }
    }

    /// Whether a repo-relative, forward-slash path is ignored.
    pub fn is_ignored(&self, path: &str) -> bool {
        if ALWAYS_IGNORED
            .iter()
            .any(|prefix| matches_as_directory(path, prefix))
        {
            return true;
        }

        self.patterns.iter().any(|pattern| match pattern {
            Pattern::Directory(dir) => matches_as_directory(path, dir),
            Pattern::Wildcard(regex) => regex.is_match(path),
            Pattern::Plain(plain) => path == plain || path.starts_with(&format!("{plain}/")),
        })
    }
}

fn matches_as_directory(path: &str, dir: &str) -> bool {
    path == dir || path.starts_with(&format!("{dir}/"))
}
