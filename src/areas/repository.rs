//! Repository facade.
//!
//! Ties the on-disk areas together and hands the porcelain commands a
//! single handle. All in-memory state is local to one command invocation;
//! the facade itself only carries paths and an output writer.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::config::{CONFIG_FILE, Config};
use crate::artifacts::hooks::{HOOKS_DIR, Hooks};
use crate::artifacts::ignore::IgnoreRules;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Metadata directory name.
pub const DIT_DIR: &str = ".dit";

const DATABASE_DIR: &str = "objects";
const INDEX_FILE: &str = "index";

pub struct Repository {
    /// Working-tree root.
    path: Box<Path>,
    /// Output sink (stdout in the CLI, a buffer in tests).
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    config: Config,
    hooks: Hooks,
}

impl Repository {
    pub fn new(path: PathBuf, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }
        let path = path.canonicalize()?;
        let dit_dir = path.join(DIT_DIR);

        Ok(Repository {
            writer: RefCell::new(writer),
            index: RefCell::new(Index::new(dit_dir.join(INDEX_FILE).into_boxed_path())),
            database: Database::new(dit_dir.join(DATABASE_DIR).into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(dit_dir.clone().into_boxed_path()),
            config: Config::new(dit_dir.join(CONFIG_FILE).into_boxed_path()),
            hooks: Hooks::new(
                dit_dir.join(HOOKS_DIR).into_boxed_path(),
                path.clone().into_boxed_path(),
            ),
            path: path.into_boxed_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dit_dir(&self) -> PathBuf {
        self.path.join(DIT_DIR)
    }

    pub fn is_initialized(&self) -> bool {
        self.dit_dir().is_dir()
    }

    pub fn writer(&self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn ignore_rules(&self) -> IgnoreRules {
        IgnoreRules::load(&self.path)
    }

    /// Author recorded in new commits: `DIT_AUTHOR_NAME` from the
    /// environment, then `user.name` from config (local, then global), then
    /// the `USER` environment variable, then "unknown".
    pub fn author(&self) -> String {
        if let Ok(name) = std::env::var("DIT_AUTHOR_NAME") {
            return name;
        }
        if let Ok(Some(name)) = self.config.get("user.name") {
            return name;
        }
        std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
    }

    /// Commit timestamp: `DIT_AUTHOR_DATE` (epoch seconds) when set,
    /// otherwise the current time.
    pub fn commit_timestamp(&self) -> i64 {
        std::env::var("DIT_AUTHOR_DATE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| chrono::Utc::now().timestamp())
    }
}
