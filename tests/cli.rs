use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cargo_bin() -> &'static str {
    "jsonmend"
}

#[test]
fn cli_stdin_stdout_basic() {
    let mut cmd = Command::cargo_bin(cargo_bin()).unwrap();
    cmd.write_stdin("{'a':1, b: 'x'}\n")
        .assert()
        .success()
        .stdout(predicate::function(|out: &[u8]| {
            std::str::from_utf8(out)
                .ok()
                .and_then(|s| serde_json::from_str::<serde_json::Value>(s).ok())
                .is_some()
        }));
}

#[test]
fn cli_indent_zero_matches_contract() {
    let mut cmd = Command::cargo_bin(cargo_bin()).unwrap();
    cmd.args(["--indent", "0"])
        .write_stdin("{key:value")
        .assert()
        .success()
        .stdout("{\n\"key\": \"value\"\n}\n");
}

#[test]
fn cli_output_file_has_no_trailing_newline() {
    let dir = tempdir().unwrap();
    let inp = dir.path().join("in.json");
    let out = dir.path().join("out.json");
    fs::write(&inp, "{key:value").unwrap();
    Command::cargo_bin(cargo_bin())
        .unwrap()
        .args([
            inp.to_str().unwrap(),
            "--indent",
            "0",
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(out).unwrap(), "{\n\"key\": \"value\"\n}");
}

#[test]
fn cli_inline_rewrites_the_file() {
    let dir = tempdir().unwrap();
    let inp = dir.path().join("inplace.json");
    fs::write(&inp, "{'a':1, b:2}").unwrap();
    Command::cargo_bin(cargo_bin())
        .unwrap()
        .args(["--inline", inp.to_str().unwrap()])
        .assert()
        .success();
    let s = fs::read_to_string(&inp).unwrap();
    let v: serde_json::Value = serde_json::from_str(&s).unwrap();
    assert_eq!(v, serde_json::json!({"a": 1, "b": 2}));
}

#[test]
fn cli_inline_requires_filename() {
    Command::cargo_bin(cargo_bin())
        .unwrap()
        .arg("--inline")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Inline mode requires a filename"));
}

#[test]
fn cli_inline_and_output_conflict() {
    Command::cargo_bin(cargo_bin())
        .unwrap()
        .args(["dummy.json", "--inline", "--output", "out.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "You cannot pass both --inline and --output",
        ));
}

#[test]
fn cli_ensure_ascii_both_spellings() {
    for flag in ["--ensure-ascii", "--ensure_ascii"] {
        let mut cmd = Command::cargo_bin(cargo_bin()).unwrap();
        cmd.arg(flag)
            .write_stdin("{\"key\": \"value\u{263A}\"}")
            .assert()
            .success()
            .stdout(predicate::str::contains("\\u263a"));
    }
}

#[test]
fn cli_strict_fails_on_broken_input() {
    Command::cargo_bin(cargo_bin())
        .unwrap()
        .arg("--strict")
        .write_stdin("{'a': 1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn cli_strict_accepts_valid_input() {
    Command::cargo_bin(cargo_bin())
        .unwrap()
        .arg("--strict")
        .write_stdin("{\"a\": 1}")
        .assert()
        .success()
        .stdout("{\"a\": 1}\n");
}

#[test]
fn cli_missing_input_file_fails() {
    Command::cargo_bin(cargo_bin())
        .unwrap()
        .arg("/no/such/input.json")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}
