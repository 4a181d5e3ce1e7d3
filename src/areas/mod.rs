pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;

use anyhow::Context;
use std::path::Path;

/// Replace the file at `path` atomically via write-temp-then-rename.
///
/// Used for HEAD, ref files and the index so an interrupted write never
/// leaves a half-written file behind.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("invalid target path {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("unable to create directory {}", dir.display()))?;

    let file_name = path
        .file_name()
        .with_context(|| format!("invalid target path {}", path.display()))?
        .to_string_lossy()
        .into_owned();
    let temp_path = dir.join(format!(".{}.tmp", file_name));

    std::fs::write(&temp_path, bytes)
        .with_context(|| format!("unable to write {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path)
        .with_context(|| format!("unable to rename {} into place", temp_path.display()))?;

    Ok(())
}
