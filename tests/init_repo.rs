mod common;

use common::command::{repository_dir, run_dit_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn init_creates_the_repository_layout(repository_dir: TempDir) {
    run_dit_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized empty dit repository"));

    let dit = repository_dir.path().join(".dit");
    assert!(dit.join("objects").is_dir());
    assert!(dit.join("refs").join("heads").is_dir());
    assert!(dit.join("hooks").join("pre-commit").is_file());
    assert!(dit.join("config").is_file());
    assert!(dit.join("index").is_file());

    let head = std::fs::read_to_string(dit.join("HEAD")).unwrap();
    assert_eq!(head, "ref: refs/heads/master\n");
}

#[rstest]
fn init_twice_fails(repository_dir: TempDir) {
    run_dit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    run_dit_command(repository_dir.path(), &["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[rstest]
fn commands_outside_a_repository_fail(repository_dir: TempDir) {
    run_dit_command(repository_dir.path(), &["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a dit repository"));
}

#[rstest]
fn init_seeds_the_default_config(repository_dir: TempDir) {
    run_dit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let config = std::fs::read_to_string(repository_dir.path().join(".dit").join("config")).unwrap();
    assert!(config.contains("[core]"));
    assert!(config.contains("repositoryformatversion = 0"));
    assert!(config.contains("bare = false"));
}
