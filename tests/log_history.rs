mod common;

use common::command::{dit_commit, init_repository_dir, run_dit_command};
use common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn empty_repository_has_no_commits(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_dit_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No commits"));
}

#[rstest]
fn history_lists_newest_first_with_head_decoration(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    for (file, message) in [("one.txt", "first"), ("two.txt", "second"), ("three.txt", "third")] {
        write_file(FileSpec::new(dir.path().join(file), format!("{message}\n")));
        run_dit_command(dir.path(), &["add", file]).assert().success();
        dit_commit(dir.path(), message).assert().success();
    }

    let output = run_dit_command(dir.path(), &["log"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();

    let third_at = stdout.find("third").expect("log lists third");
    let second_at = stdout.find("second").expect("log lists second");
    let first_at = stdout.find("first").expect("log lists first");
    assert!(third_at < second_at && second_at < first_at);

    // Only the newest commit carries the decoration.
    assert_eq!(stdout.matches("(HEAD -> master)").count(), 1);
    let decorated_at = stdout.find("(HEAD -> master)").unwrap();
    assert!(decorated_at < third_at);
}

#[rstest]
fn log_shows_author_and_date(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("a.txt"), "x\n".to_string()));
    run_dit_command(dir.path(), &["add", "a.txt"]).assert().success();

    let mut cmd = run_dit_command(dir.path(), &["commit", "-m", "dated"]);
    cmd.env("DIT_AUTHOR_NAME", "alice")
        .env("DIT_AUTHOR_DATE", "1700000000");
    cmd.assert().success();

    run_dit_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Author: alice"))
        .stdout(predicate::str::contains("Date:   "))
        .stdout(predicate::str::contains("    dated"));
}
