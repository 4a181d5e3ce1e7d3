use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};

/// Commit timestamps are handed out from a monotonically increasing
/// counter so log ordering is deterministic even when a test creates
/// several commits within the same wall-clock second.
static CLOCK: AtomicI64 = AtomicI64::new(1_700_000_000);

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_dit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir
}

pub fn run_dit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("dit").expect("failed to find dit binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn dit_commit(dir: &Path, message: &str) -> Command {
    let timestamp = CLOCK.fetch_add(1, Ordering::SeqCst);
    let author = generate_random_author();

    let mut cmd = run_dit_command(dir, &["commit", "-m", message]);
    cmd.env("DIT_AUTHOR_NAME", author)
        .env("DIT_AUTHOR_DATE", timestamp.to_string());
    cmd
}

pub fn dit_merge(dir: &Path, branch: &str) -> Command {
    let timestamp = CLOCK.fetch_add(1, Ordering::SeqCst);
    let author = generate_random_author();

    let mut cmd = run_dit_command(dir, &["merge", branch]);
    cmd.env("DIT_AUTHOR_NAME", author)
        .env("DIT_AUTHOR_DATE", timestamp.to_string());
    cmd
}

fn generate_random_author() -> String {
    use fake::Fake;
    use fake::faker::name::en::Name;

    Name().fake::<String>().replace(' ', "_")
}

/// The commit hash a branch ref currently points at.
pub fn read_ref(dir: &Path, branch: &str) -> String {
    let ref_path = dir.join(".dit").join("refs").join("heads").join(branch);
    std::fs::read_to_string(ref_path)
        .expect("failed to read branch ref")
        .trim()
        .to_string()
}

pub fn read_head(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".dit").join("HEAD"))
        .expect("failed to read HEAD")
        .trim()
        .to_string()
}

pub fn read_index(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".dit").join("index")).unwrap_or_default()
}

pub fn merge_head_exists(dir: &Path) -> bool {
    dir.join(".dit").join("MERGE_HEAD").exists()
}
