//! Sectioned key/value configuration.
//!
//! Stored as INI-like text: `[section]` headers followed by `key = value`
//! lines. Keys are addressed as `section.key`; keys outside any section are
//! addressed bare. Reads fall back to the global file at `$HOME/.gitconfig`
//! when the local file has no value.

use anyhow::Context;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config";

#[derive(Debug)]
pub struct Config {
    path: Box<Path>,
}

impl Config {
    pub fn new(path: Box<Path>) -> Self {
        Config { path }
    }

    /// Look a key up locally, then in the global config.
    pub fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        if let Some(value) = lookup(&self.path, key)? {
            return Ok(Some(value));
        }
        match global_config_path() {
            Some(global) => lookup(&global, key),
            None => Ok(None),
        }
    }

    /// Set a key in the local config, creating the file if needed.
    pub fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut pairs = read_pairs(&self.path)?;
        match pairs.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, existing_value)) => *existing_value = value.to_string(),
            None => pairs.push((key.to_string(), value.to_string())),
        }
        write_pairs(&self.path, &pairs)
    }
}

fn global_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".gitconfig"))
}

fn lookup(path: &Path, key: &str) -> anyhow::Result<Option<String>> {
    Ok(read_pairs(path)?
        .into_iter()
        .find(|(existing, _)| existing == key)
        .map(|(_, value)| value))
}

/// Parse a config file into ordered `section.key -> value` pairs.
fn read_pairs(path: &Path) -> anyhow::Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    if !path.exists() {
        return Ok(pairs);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read config at {}", path.display()))?;

    let mut section = String::new();
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('[') && line.ends_with(']') {
            section = line[1..line.len() - 1].to_string();
        } else if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let full_key = if section.is_empty() {
                key.to_string()
            } else {
                format!("{section}.{key}")
            };
            pairs.push((full_key, value.trim().to_string()));
        }
    }
    Ok(pairs)
}

/// Write pairs back, grouped by section, preserving first-seen order.
fn write_pairs(path: &Path, pairs: &[(String, String)]) -> anyhow::Result<()> {
    let mut sections: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in pairs {
        let (section, bare_key) = match key.split_once('.') {
            Some((section, rest)) => (section.to_string(), rest.to_string()),
            None => (String::new(), key.to_string()),
        };
        let line = format!("{bare_key} = {value}");
        match sections.iter_mut().find(|(name, _)| *name == section) {
            Some((_, lines)) => lines.push(line),
            None => sections.push((section, vec![line])),
        }
    }

    let mut content = String::new();
    for (section, lines) in &sections {
        if !section.is_empty() {
            content.push_str(&format!("[{section}]\n"));
        }
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        content.push('\n');
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("unable to create {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("unable to write config at {}", path.display()))
}
