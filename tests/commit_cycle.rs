mod common;

use common::command::{dit_commit, init_repository_dir, read_index, read_ref, run_dit_command};
use common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn basic_commit_cycle(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("a.txt"), "hello\n".to_string()));
    run_dit_command(dir.path(), &["add", "a.txt"]).assert().success();

    dit_commit(dir.path(), "c1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Committed: "));

    // The index is cleared and master points at the new commit.
    assert_eq!(read_index(dir.path()), "");
    let commit_hash = read_ref(dir.path(), "master");
    assert_eq!(commit_hash.len(), 40);

    // The commit names a tree with exactly one blob entry for a.txt,
    // hashed over "blob 6\0hello\n".
    let commit_bytes = read_object(dir.path(), &commit_hash);
    let commit_text = String::from_utf8(commit_bytes).unwrap();
    let tree_hash = commit_text
        .split_once("tree ")
        .unwrap()
        .1
        .split_whitespace()
        .next()
        .unwrap();

    let tree_bytes = read_object(dir.path(), tree_hash);
    let tree_text = String::from_utf8(tree_bytes).unwrap();
    let tree_content = tree_text.split_once('\0').unwrap().1;
    assert_eq!(
        tree_content,
        "blob ce013625030ba8dba906f756967f9e9ca394464a a.txt\n"
    );
}

#[rstest]
fn commit_with_empty_index_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    dit_commit(dir.path(), "empty")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to commit"));
}

#[rstest]
fn committing_a_staged_deletion_produces_an_empty_tree(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("a.txt"), "hello\n".to_string()));
    run_dit_command(dir.path(), &["add", "a.txt"]).assert().success();
    dit_commit(dir.path(), "c1").assert().success();

    std::fs::remove_file(dir.path().join("a.txt")).unwrap();
    run_dit_command(dir.path(), &["add", "a.txt"]).assert().success();
    dit_commit(dir.path(), "c2").assert().success();

    let commit_hash = read_ref(dir.path(), "master");
    let commit_text = String::from_utf8(read_object(dir.path(), &commit_hash)).unwrap();
    let tree_hash = commit_text
        .split_once("tree ")
        .unwrap()
        .1
        .split_whitespace()
        .next()
        .unwrap();

    // sha1("tree 0\0") is the id of the empty tree.
    assert_eq!(tree_hash, "4b825dc642cb6eb9a060e54bf8d69288fbee4904");

    // Newest first in the log.
    let output = run_dit_command(dir.path(), &["log"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let c2_at = stdout.find("c2").expect("log lists c2");
    let c1_at = stdout.find("c1").expect("log lists c1");
    assert!(c2_at < c1_at);
}

#[rstest]
fn commit_writes_identical_content_once(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("a.txt"), "same\n".to_string()));
    write_file(FileSpec::new(dir.path().join("b.txt"), "same\n".to_string()));
    run_dit_command(dir.path(), &["add", "."]).assert().success();
    dit_commit(dir.path(), "c1").assert().success();

    // Both files share one blob object.
    let objects = dir.path().join(".dit").join("objects");
    let blob_count = walkdir_count(&objects);
    // one blob + one tree + one commit
    assert_eq!(blob_count, 3);
}

#[rstest]
fn checkout_of_a_commit_reproduces_its_tree(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("a.txt"), "v1\n".to_string()));
    write_file(FileSpec::new(
        dir.path().join("src").join("lib.rs"),
        "fn v1() {}\n".to_string(),
    ));
    run_dit_command(dir.path(), &["add", "."]).assert().success();
    dit_commit(dir.path(), "c1").assert().success();
    let first = read_ref(dir.path(), "master");

    write_file(FileSpec::new(dir.path().join("a.txt"), "v2\n".to_string()));
    run_dit_command(dir.path(), &["add", "."]).assert().success();
    dit_commit(dir.path(), "c2").assert().success();

    run_dit_command(dir.path(), &["checkout", &first])
        .assert()
        .success()
        .stdout(predicate::str::contains("HEAD is now at"));

    assert_eq!(read_file(dir.path(), "a.txt"), "v1\n");
    assert_eq!(read_file(dir.path(), "src/lib.rs"), "fn v1() {}\n");
}

#[rstest]
fn pre_commit_hook_failure_aborts_the_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("a.txt"), "hello\n".to_string()));
    run_dit_command(dir.path(), &["add", "a.txt"]).assert().success();

    let hook = dir.path().join(".dit").join("hooks").join("pre-commit");
    std::fs::write(&hook, "#!/bin/sh\nexit 1\n").unwrap();
    make_executable(&hook);

    dit_commit(dir.path(), "blocked")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pre-commit hook"));

    // No ref was written.
    assert!(!dir
        .path()
        .join(".dit")
        .join("refs")
        .join("heads")
        .join("master")
        .exists());
}

fn read_object(dir: &std::path::Path, hash: &str) -> Vec<u8> {
    let path = dir
        .join(".dit")
        .join("objects")
        .join(&hash[..2])
        .join(&hash[2..]);
    std::fs::read(path).expect("object exists")
}

fn walkdir_count(dir: &std::path::Path) -> usize {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .count()
}

#[cfg(unix)]
fn make_executable(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = std::fs::metadata(path).unwrap().permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(path, permissions).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &std::path::Path) {}
