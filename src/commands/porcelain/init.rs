use crate::areas::refs::HEADS_PREFIX;
use crate::areas::repository::Repository;
use crate::errors::DitError;
use anyhow::Context;
use std::fs;
use std::io::Write;

const DEFAULT_BRANCH: &str = "master";

impl Repository {
    /// Create the metadata directory, seed HEAD on the default branch,
    /// install the sample hooks and the default config.
    pub fn init(&self) -> anyhow::Result<()> {
        let dit_dir = self.dit_dir();
        if dit_dir.exists() {
            anyhow::bail!(DitError::AlreadyExists(dit_dir.display().to_string()));
        }

        fs::create_dir_all(self.database().objects_path())
            .context("unable to create the objects directory")?;
        fs::create_dir_all(dit_dir.join(HEADS_PREFIX))
            .context("unable to create the refs directory")?;

        self.refs()
            .set_head_to_ref(&format!("{HEADS_PREFIX}/{DEFAULT_BRANCH}"))?;
        fs::write(self.index().path(), "").context("unable to create the index")?;

        self.hooks().install_defaults()?;

        for (key, value) in [
            ("core.repositoryformatversion", "0"),
            ("core.filemode", "true"),
            ("core.bare", "false"),
            ("core.logallrefupdates", "true"),
            ("core.ignorecase", "true"),
            ("core.precomposeunicode", "true"),
        ] {
            self.config().set(key, value)?;
        }

        writeln!(
            self.writer(),
            "Initialized empty dit repository in {}",
            dit_dir.display()
        )?;

        Ok(())
    }
}
