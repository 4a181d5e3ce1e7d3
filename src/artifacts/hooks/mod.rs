//! Commit-boundary hooks.
//!
//! Hooks are plain executables under the metadata `hooks/` directory. A
//! missing or non-executable hook passes. `pre-commit` and `commit-msg` run
//! before the commit object is written and abort it on failure;
//! `post-commit` runs after the ref update and its result is ignored.

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const HOOKS_DIR: &str = "hooks";

pub const PRE_COMMIT: &str = "pre-commit";
pub const COMMIT_MSG: &str = "commit-msg";
pub const POST_COMMIT: &str = "post-commit";

#[derive(Debug)]
pub struct Hooks {
    dir: Box<Path>,
    work_dir: Box<Path>,
}

impl Hooks {
    pub fn new(dir: Box<Path>, work_dir: Box<Path>) -> Self {
        Hooks { dir, work_dir }
    }

    fn hook_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Run a hook, returning whether it passed.
    pub fn run(&self, name: &str, args: &[&str]) -> anyhow::Result<bool> {
        let hook = self.hook_path(name);
        if !hook.is_file() || !is_executable(&hook) {
            return Ok(true);
        }

        let status = Command::new(&hook)
            .args(args)
            .current_dir(self.work_dir.as_ref())
            .env("DIT_DIR", self.dir.parent().unwrap_or(self.dir.as_ref()))
            .env("DIT_WORK_TREE", self.work_dir.as_ref())
            .status()
            .with_context(|| format!("unable to run hook {name}"))?;

        Ok(status.success())
    }

    /// Install the sample hooks created by `init`.
    pub fn install_defaults(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(self.dir.as_ref())
            .with_context(|| format!("unable to create {}", self.dir.display()))?;

        self.install(
            PRE_COMMIT,
            "#!/bin/sh\n\
             # Runs before a commit is recorded; exit non-zero to abort it.\n\
             exit 0\n",
        )?;
        self.install(
            COMMIT_MSG,
            "#!/bin/sh\n\
             # Receives the commit message as $1; exit non-zero to abort.\n\
             exit 0\n",
        )?;
        self.install(
            POST_COMMIT,
            "#!/bin/sh\n\
             # Receives the new commit hash as $1 after the ref update.\n\
             exit 0\n",
        )?;

        Ok(())
    }

    fn install(&self, name: &str, content: &str) -> anyhow::Result<()> {
        let path = self.hook_path(name);
        std::fs::write(&path, content)
            .with_context(|| format!("unable to write hook {name}"))?;
        make_executable(&path)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|metadata| metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

#[cfg(unix)]
fn make_executable(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    std::fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}
