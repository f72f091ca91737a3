use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn run(args: &[&str], path: &Path) -> (String, String, bool) {
    let mut cmd = Command::cargo_bin("texlex").unwrap();
    cmd.arg("--no-color").args(args).arg(path);
    let output = cmd.output().unwrap();
    (
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
        output.status.success(),
    )
}

#[test]
fn bytes() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "main.tex", b"a\n^");
    let (stdout, _, success) = run(&["bytes"], &path);
    assert!(success);
    similar_asserts::assert_eq!(
        stdout,
        "main.tex:1:1\tU+0061\t'a'\nmain.tex:1:2\tU+000A\t'\\n'\nmain.tex:2:1\tU+005E\t'^'\n"
    );
}

#[test]
fn chars() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "main.tex", b"a^^M\\");
    let (stdout, _, success) = run(&["chars"], &path);
    assert!(success);
    similar_asserts::assert_eq!(
        stdout,
        "main.tex:1:1\tU+0061\t'a'\tLetter\t1\n\
         main.tex:1:2\tU+000D\t'\\r'\tEndOfLine\t3\n\
         main.tex:1:5\tU+005C\t'\\\\'\tEscape\t1\n"
    );
}

#[test]
fn tokens() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "main.tex", b"\\hello world\n\n");
    let (stdout, _, success) = run(&["tokens"], &path);
    assert!(success);
    similar_asserts::assert_eq!(
        stdout,
        "main.tex:1:1\t\\hello\n\
         main.tex:1:8\t'w'\tLetter\n\
         main.tex:1:9\t'o'\tLetter\n\
         main.tex:1:10\t'r'\tLetter\n\
         main.tex:1:11\t'l'\tLetter\n\
         main.tex:1:12\t'd'\tLetter\n\
         main.tex:1:13\t' '\tSpace\n\
         main.tex:2:1\t\\par\n"
    );
}

#[test]
fn plain_catcodes() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "main.tex", b"{");
    let (stdout, _, _) = run(&["tokens", "--catcodes", "plain"], &path);
    assert_eq!(stdout, "main.tex:1:1\t'{'\tBeginGroup\n");
    let (stdout, _, _) = run(&["tokens", "--catcodes", "initex"], &path);
    assert_eq!(stdout, "main.tex:1:1\t'{'\tOther\n");
}

#[test]
fn high_bytes() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "main.tex", b"a\xE9");

    let mut cmd = Command::cargo_bin("texlex").unwrap();
    cmd.args(["--no-color", "chars"]).arg(&path);
    cmd.assert()
        .failure()
        .stdout("main.tex:1:1\tU+0061\t'a'\tLetter\t1\n")
        .stderr(predicate::str::contains(
            "error: no category code is assigned to byte 0xE9 at main.tex:1:2",
        ));

    let (stdout, _, success) = run(&["chars", "--high-bytes", "letter"], &path);
    assert!(success);
    assert_eq!(
        stdout,
        "main.tex:1:1\tU+0061\t'a'\tLetter\t1\nmain.tex:1:2\tU+00E9\t'é'\tLetter\t1\n"
    );

    // Bytes that already have a category code keep it.
    let path = write(dir.path(), "low.tex", b"\x7F\xE9");
    let (stdout, _, success) = run(&["chars", "--high-bytes", "12"], &path);
    assert!(success);
    assert_eq!(
        stdout,
        "low.tex:1:1\tU+007F\t'\\u{7f}'\tInvalid\t1\nlow.tex:1:2\tU+00E9\t'é'\tOther\t1\n"
    );
}

#[test]
fn invalid_high_bytes_category() {
    let mut cmd = Command::cargo_bin("texlex").unwrap();
    cmd.args(["chars", "--high-bytes", "16", "main.tex"]);
    cmd.assert().failure().stderr(predicate::str::contains(
        "category codes are between 0 and 15, got 16",
    ));
}

#[test]
fn insert() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "main.tex", b"c");
    let a = write(dir.path(), "a.tex", b"a");
    let b = write(dir.path(), "b.tex", b"b");

    let mut cmd = Command::cargo_bin("texlex").unwrap();
    cmd.args(["--no-color", "bytes", "--insert"])
        .arg(&a)
        .arg("--insert")
        .arg(&b)
        .arg(&path);
    cmd.assert().success().stdout(
        "b.tex:1:1\tU+0062\t'b'\n\
         a.tex:1:1\tU+0061\t'a'\n\
         main.tex:1:1\tU+0063\t'c'\n",
    );
}

#[test]
fn input_control_sequence() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path(), "chapter.tex", b"x");
    let path = write(dir.path(), "main.tex", b"\\input chapter y");
    let (stdout, _, success) = run(&["tokens", "--input-cs", "input"], &path);
    assert!(success);
    assert_eq!(
        stdout,
        "chapter.tex:1:1\t'x'\tLetter\nmain.tex:1:16\t'y'\tLetter\n"
    );

    let (stdout, _, _) = run(&["tokens"], &path);
    assert!(stdout.starts_with("main.tex:1:1\t\\input\n"));
}

#[test]
fn input_missing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "main.tex", b"\\input missing");
    let mut cmd = Command::cargo_bin("texlex").unwrap();
    cmd.args(["--no-color", "tokens", "--input-cs", "input"])
        .arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("main.tex:1:1: failed to input"));
}

#[test]
fn invalid_character() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "main.tex", b"a\x7F");
    let mut cmd = Command::cargo_bin("texlex").unwrap();
    cmd.args(["--no-color", "tokens"]).arg(&path);
    cmd.assert()
        .failure()
        .stdout("main.tex:1:1\t'a'\tLetter\n")
        .stderr(predicate::str::contains(
            "error: invalid character 0x7F at main.tex:1:2",
        ));
}

#[test]
fn missing_file() {
    let mut cmd = Command::cargo_bin("texlex").unwrap();
    cmd.args(["--no-color", "bytes", "does-not-exist.tex"]);
    cmd.assert().failure().stderr(predicate::str::starts_with(
        "error: failed to read does-not-exist.tex",
    ));
}

#[test]
fn missing_inserted_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "main.tex", b"a");
    let mut cmd = Command::cargo_bin("texlex").unwrap();
    cmd.args(["--no-color", "bytes", "--insert", "missing.tex"])
        .arg(&path);
    cmd.assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::starts_with("error: failed to read missing.tex"));
}
